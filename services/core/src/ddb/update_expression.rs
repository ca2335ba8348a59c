use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

/// Incremental builder for `SET` update expressions.
///
/// Every attribute is aliased through `ExpressionAttributeNames`, so callers
/// never collide with DynamoDB reserved words.
#[derive(Debug, Default)]
pub struct SetUpdate {
    clauses: Vec<String>,
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl SetUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `#attr = :attr` assignment.
    pub fn set(&mut self, attribute: &str, value: AttributeValue) -> &mut Self {
        self.clauses.push(format!("#{attribute} = :{attribute}"));
        self.names.insert(format!("#{attribute}"), attribute.to_string());
        self.values.insert(format!(":{attribute}"), value);
        self
    }

    /// Registers a name alias without assigning to it. Needed when a
    /// condition expression references an attribute the update does not touch.
    pub fn alias(&mut self, attribute: &str) -> String {
        let placeholder = format!("#{attribute}");
        self.names.insert(placeholder.clone(), attribute.to_string());
        placeholder
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Consumes the builder, yielding the update expression together with the
    /// name and value maps.
    pub fn into_parts(self) -> (String, HashMap<String, String>, HashMap<String, AttributeValue>) {
        let expression = format!("SET {}", self.clauses.join(", "));
        (expression, self.names, self.values)
    }
}
