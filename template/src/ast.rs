/// A piece of template text: either copied through verbatim or substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, including all whitespace and newlines.
    Text(&'a str),
    /// Name of the variable inside a `{{ name }}` placeholder.
    Var(&'a str),
}
