//! Prompt templates with `{name}` placeholder substitution.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Result alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while parsing or rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// The template references a variable that is not provided.
    #[error("missing required variable: {name}")]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
    },

    /// The template text could not be parsed.
    #[error("malformed template at byte {position}: {reason}")]
    Malformed {
        /// Byte offset of the offending character.
        position: usize,
        /// Reason for the failure.
        reason: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A parsed prompt template.
///
/// `{name}` inserts the value of `name`; `{{` and `}}` produce literal braces.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use mona_prompts::PromptTemplate;
///
/// let template = PromptTemplate::parse("Titre: {titre} {{brut}}").unwrap();
/// let vars = HashMap::from([("titre", "La Joconde".to_owned())]);
/// assert_eq!(template.render(&vars).unwrap(), "Titre: La Joconde {brut}");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parses template text.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Malformed`] for an unmatched brace or an empty
    /// placeholder.
    pub fn parse(source: impl Into<String>) -> TemplateResult<Self> {
        let source = source.into();
        let segments = parse_segments(&source)?;
        Ok(Self { source, segments })
    }

    /// Returns the distinct variable names referenced by the template.
    #[must_use]
    pub fn placeholders(&self) -> BTreeSet<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Variable(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Checks that every placeholder is among `provided`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingVariable`] naming the first placeholder
    /// that `provided` does not cover.
    pub fn ensure_provided(&self, provided: &[&str]) -> TemplateResult<()> {
        match self
            .placeholders()
            .into_iter()
            .find(|name| !provided.contains(name))
        {
            Some(name) => Err(TemplateError::MissingVariable {
                name: name.to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// Renders the template with the supplied variables.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingVariable`] if a placeholder has no value.
    pub fn render(&self, vars: &HashMap<&str, String>) -> TemplateResult<String> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value =
                        vars.get(name.as_str())
                            .ok_or_else(|| TemplateError::MissingVariable {
                                name: name.clone(),
                            })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    /// Returns the raw template string.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_segments(source: &str) -> TemplateResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        match ch {
            '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    match inner {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => {
                            return Err(TemplateError::Malformed {
                                position,
                                reason: "unexpected '{' inside placeholder",
                            });
                        }
                        other => name.push(other),
                    }
                }
                if !closed {
                    return Err(TemplateError::Malformed {
                        position,
                        reason: "unterminated placeholder",
                    });
                }
                let name = name.trim();
                if name.is_empty() {
                    return Err(TemplateError::Malformed {
                        position,
                        reason: "empty placeholder",
                    });
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(name.to_owned()));
            }
            '}' => {
                return Err(TemplateError::Malformed {
                    position,
                    reason: "single '}' outside placeholder",
                });
            }
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
