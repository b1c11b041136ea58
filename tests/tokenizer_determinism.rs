//! Property-based tests for the tokenizer
//!
//! Tokenization is a pure function of the lines seen so far: two tokenizers fed the same
//! lines produce the same tokens, and every token stays on its own line in column order.

use proptest::prelude::*;
use yamlite::yaml::lexing::Tokenizer;
use yamlite::yaml::token::{Token, TokenType};

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}: [a-z0-9]{1,6}",
        "[a-z]{1,6}:",
        "- [a-z0-9]{1,6}",
        "- [a-z]{1,4}: [a-z]{1,4}",
        "[a-z]{1,4}: '[a-z ]{0,6}'",
        "[a-z]{1,4}: \"[a-z ]{0,6}\"",
        "[a-z]{1,4}: \\[[a-z]{1,3}, [0-9]{1,3}\\]",
        "[a-z]{1,4}: \\{[a-z]{1,3}: [0-9]{1,3}\\}",
        "[a-z]{1,4}: &[a-z]{1,3} [a-z]{1,3}",
        "[a-z]{1,4}: \\*[a-z]{1,3}",
        "[a-z]{1,4}: [a-z]{1,4} # [a-z ]{0,8}",
        "# [a-z ]{0,10}",
        Just(String::new()),
        Just("---".to_string()),
        Just("...".to_string()),
    ]
}

fn line() -> impl Strategy<Value = String> {
    (0usize..4, fragment()).prop_map(|(depth, text)| {
        if text.is_empty() {
            text
        } else {
            format!("{}{}", "  ".repeat(depth), text)
        }
    })
}

fn tokenize_all(lines: &[String]) -> Vec<Result<Vec<Token>, (usize, usize)>> {
    let mut tokenizer = Tokenizer::new();
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            tokenizer
                .tokenize(line, index + 1)
                .map_err(|err| (err.line, err.column))
        })
        .collect()
}

proptest! {
    #[test]
    fn test_tokenizing_twice_gives_identical_tokens(lines in prop::collection::vec(line(), 1..20)) {
        prop_assert_eq!(tokenize_all(&lines), tokenize_all(&lines));
    }

    #[test]
    fn test_tokens_stay_on_their_line_in_column_order(lines in prop::collection::vec(line(), 1..20)) {
        for (index, result) in tokenize_all(&lines).into_iter().enumerate() {
            let Ok(tokens) = result else { continue };
            let line_number = index + 1;
            prop_assert!(!tokens.is_empty());
            for token in &tokens {
                prop_assert_eq!(token.line, line_number);
            }
            for pair in tokens.windows(2) {
                prop_assert!(pair[0].column < pair[1].column, "columns out of order: {:?}", tokens);
            }
            let last = tokens[tokens.len() - 1].kind;
            prop_assert!(
                last == TokenType::Newline || last.is_document_marker(),
                "line {} ends with {:?}",
                line_number,
                last
            );
        }
    }

    #[test]
    fn test_indentation_only_leads_a_line(lines in prop::collection::vec(line(), 1..20)) {
        for result in tokenize_all(&lines) {
            let Ok(tokens) = result else { continue };
            for token in tokens.iter().skip(1) {
                prop_assert!(!token.is(TokenType::Indentation));
            }
        }
    }
}
