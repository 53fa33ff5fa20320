use anyhow::{Context as _, Result};

use crate::ast::Segment;
use crate::{Context, Error};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Var(String),
}

/// A parsed template that can be rendered any number of times.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    parts: Vec<Part>,
}

impl Template {
    /// Parse `source`; `name` is only used in error messages.
    pub fn parse(name: &str, source: &str) -> Result<Self> {
        let segments = crate::parse(source)
            .with_context(|| format!("while parsing template \"{name}\""))?;
        let parts = segments
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) => Part::Text(text.to_owned()),
                Segment::Var(var) => Part::Var(var.to_owned()),
            })
            .collect();
        Ok(Self {
            name: name.to_owned(),
            parts,
        })
    }

    pub fn render(&self, ctx: &Context) -> Result<String, Error> {
        let mut buf = String::with_capacity(self.len_hint());
        self.render_to(ctx, &mut buf)?;
        Ok(buf)
    }

    /// Append the rendered template to `buf`.
    pub fn render_to(&self, ctx: &Context, buf: &mut String) -> Result<(), Error> {
        for part in &self.parts {
            match part {
                Part::Text(text) => buf.push_str(text),
                Part::Var(var) => {
                    let value = ctx.get(var).ok_or_else(|| Error::UndefinedVariable {
                        template: self.name.clone(),
                        var: var.clone(),
                    })?;
                    buf.push_str(value);
                }
            }
        }
        Ok(())
    }

    fn len_hint(&self) -> usize {
        self.parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => text.len(),
                Part::Var(_) => 16,
            })
            .sum()
    }
}
