//! Send requests

use serde::Serialize;
use serde_json::Value;

use crate::domain::communication::{email_addresses::EmailAddress, templates::RenderError};

/// The body of a message
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    /// A literal HTML body
    Body(String),

    /// A template rendered into the body at send time
    Template {
        /// The template identifier
        name: String,

        /// The data handed to the template
        model: Value,
    },
}

impl Content {
    /// A literal HTML body
    pub fn body(body: impl Into<String>) -> Self {
        Self::Body(body.into())
    }

    /// A templated body. Fails if `model` cannot be serialized.
    pub fn template<M>(name: impl Into<String>, model: &M) -> Result<Self, RenderError>
    where
        M: Serialize + ?Sized,
    {
        Ok(Self::Template {
            name: name.into(),
            model: serde_json::to_value(model)?,
        })
    }
}

/// A request to send one message
#[derive(Clone, Debug, PartialEq)]
pub struct SendRequest {
    /// The recipients. Must not be empty.
    pub to: Vec<EmailAddress>,

    /// The copied recipients
    pub cc: Vec<EmailAddress>,

    /// The subject of the email
    pub subject: String,

    /// The body of the email
    pub content: Content,
}

impl SendRequest {
    /// Creates a request without copied recipients
    pub fn new(to: Vec<EmailAddress>, subject: impl Into<String>, content: Content) -> Self {
        Self {
            to,
            cc: Vec::new(),
            subject: subject.into(),
            content,
        }
    }

    /// Copies the message to `cc`
    pub fn with_cc(mut self, cc: Vec<EmailAddress>) -> Self {
        self.cc = cc;
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[derive(Serialize)]
    struct Welcome<'a> {
        name: &'a str,
    }

    #[test]
    fn test_template_content_serializes_the_model() -> TestResult {
        let content = Content::template("welcome", &Welcome { name: "Ada" })?;

        assert_eq!(
            content,
            Content::Template {
                name: "welcome".to_string(),
                model: json!({ "name": "Ada" }),
            }
        );

        Ok(())
    }

    #[test]
    fn test_new_request_has_no_cc() -> TestResult {
        let request = SendRequest::new(
            vec![EmailAddress::new("a@x.com")?],
            "Hi",
            Content::body("Body"),
        );

        assert!(request.cc.is_empty());

        let request = request.with_cc(vec![EmailAddress::new("c@x.com")?]);

        assert_eq!(request.cc.len(), 1);

        Ok(())
    }
}
