use anyhow::Result;

use crate::ast::Segment;

#[derive(Debug, thiserror::Error)]
#[error("ParseError on line {line_no}, column {column} '{line}': {msg}")]
pub struct Error {
    msg: String,
    line_no: usize,
    column: usize,
    line: String,
}

/// Split template text into literal text and `{{ name }}` placeholders.
pub fn parse(text: &str) -> Result<Vec<Segment<'_>>> {
    use combine::EasyParser;
    template::segments()
        .easy_parse(text)
        .map(|(segments, _remainder)| segments)
        .map_err(|e| {
            let pos = e.position.translate_position(text);
            // isolate the line in question:
            let before = &text[0..pos];
            let after = &text[pos..text.len()];
            let prefix: String = before.chars().rev().take_while(|&c| c != '\n').collect();
            let prefix: String = prefix.chars().rev().collect();
            let suffix: String = after.chars().take_while(|&c| c != '\n').collect();
            let column = prefix.chars().count() + 1;
            let line_no = before.matches('\n').count() + 1;
            let line = prefix + &suffix;
            let msg = e
                .errors
                .iter()
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            Error {
                msg,
                line_no,
                column,
                line,
            }
            .into()
        })
}

pub mod prelude {
    pub use combine::parser::char::{char, string};
    pub use combine::parser::range::recognize;
    pub use combine::*;
}

mod template {
    use super::prelude::*;
    use crate::ast::Segment;
    use combine::parser::char::{alpha_num, letter};

    p! {
        ident() -> &'a str, {
            recognize(
                char('_').or(letter())
                .and(skip_many(char('_').or(alpha_num())))
            )
        }
    }

    p! {
        inline_space() -> (), {
            skip_many(one_of(" \t".chars()))
        }
    }

    p! {
        placeholder() -> &'a str, {
            string("{{")
                .with(inline_space())
                .with(ident())
                .skip(inline_space())
                .skip(string("}}"))
        }
    }

    // a '{' that doesn't open a placeholder, e.g. in `${HOME}` or `a{{{ x }}`.
    p! {
        lone_brace() -> (), {
            attempt(char('{').and(none_of("{".chars())))
                .map(|_| ())
                .or(attempt(char('{').skip(look_ahead(placeholder()))).map(|_| ()))
                .or(attempt(char('{').and(eof())).map(|_| ()))
        }
    }

    p! {
        text() -> &'a str, {
            recognize(skip_many1(
                none_of("{".chars()).map(|_| ()).or(lone_brace())
            ))
        }
    }

    p! {
        segment() -> Segment<'a>, {
            attempt(placeholder())
                .map(Segment::Var)
                .or(text().map(Segment::Text))
        }
    }

    p! {
        segments() -> Vec<Segment<'a>>, {
            many(segment()).skip(eof())
        }
    }

}
