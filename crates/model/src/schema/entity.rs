use crate::schema::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Field path the identifier attribute of every entity is stored under.
pub const ID_FIELD_NAME: &str = "_id";

/// Mapping metadata for one persistent attribute of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Attribute name as written in queries, e.g. `publishYear`.
    pub name: String,

    /// Explicit column (document field) name, if it differs from `name`.
    #[serde(default)]
    pub column: Option<String>,

    /// Whether this attribute is the entity identifier.
    #[serde(default)]
    pub id: bool,

    #[serde(default = "default_nullable")]
    pub nullable: bool,

    /// Attributes of primitive types can never hold null.
    #[serde(default)]
    pub primitive: bool,
}

fn default_nullable() -> bool {
    true
}

impl FieldSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: None,
            id: false,
            nullable: true,
            primitive: false,
        }
    }

    pub fn id(name: impl Into<String>) -> Self {
        Self {
            id: true,
            nullable: false,
            ..Self::new(name)
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primitive(mut self) -> Self {
        self.primitive = true;
        self
    }

    /// Field path of this attribute in the stored document.
    pub fn field_path(&self) -> &str {
        if self.id {
            ID_FIELD_NAME
        } else {
            self.column.as_deref().unwrap_or(&self.name)
        }
    }

    /// Whether a comparison against this field can observe null, and so
    /// needs a not-null guard to keep ternary comparison semantics.
    pub fn is_nullness_sensitive(&self) -> bool {
        !(self.id || self.primitive || !self.nullable)
    }
}

/// Mapping metadata for an entity and the collection backing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub name: String,
    pub collection: String,
    pub fields: Vec<FieldSchema>,
}

impl EntitySchema {
    pub fn new(name: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: collection.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn id_field(&self) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.id)
    }

    /// All document field paths of the entity, sorted.
    pub fn field_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .fields
            .iter()
            .map(|f| f.field_path().to_string())
            .collect();
        paths.sort();
        paths
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut names = HashSet::new();
        let mut paths = HashSet::new();

        for field in &self.fields {
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    entity: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            if !paths.insert(field.field_path()) {
                return Err(SchemaError::DuplicatePath {
                    entity: self.name.clone(),
                    path: field.field_path().to_string(),
                });
            }
        }

        match self.fields.iter().filter(|f| f.id).count() {
            0 => Err(SchemaError::MissingId(self.name.clone())),
            1 => Ok(()),
            count => Err(SchemaError::MultipleIds {
                entity: self.name.clone(),
                count,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> EntitySchema {
        EntitySchema::new("Book", "books")
            .with_field(FieldSchema::id("id"))
            .with_field(FieldSchema::new("title").not_null())
            .with_field(FieldSchema::new("publishYear").primitive())
            .with_field(FieldSchema::new("isbn").with_column("isbn13"))
    }

    #[test]
    fn test_field_paths() {
        let schema = book();
        assert_eq!(schema.field("id").unwrap().field_path(), "_id");
        assert_eq!(schema.field("isbn").unwrap().field_path(), "isbn13");
        assert_eq!(schema.field("title").unwrap().field_path(), "title");
        assert_eq!(
            schema.field_paths(),
            vec!["_id", "isbn13", "publishYear", "title"]
        );
    }

    #[test]
    fn test_nullness_sensitivity() {
        let schema = book();
        assert!(!schema.field("id").unwrap().is_nullness_sensitive());
        assert!(!schema.field("title").unwrap().is_nullness_sensitive());
        assert!(!schema.field("publishYear").unwrap().is_nullness_sensitive());
        assert!(schema.field("isbn").unwrap().is_nullness_sensitive());
    }

    #[test]
    fn test_validate() {
        assert!(book().validate().is_ok());

        let no_id = EntitySchema::new("Book", "books").with_field(FieldSchema::new("title"));
        assert!(matches!(no_id.validate(), Err(SchemaError::MissingId(_))));

        let clash = book().with_field(FieldSchema::new("isbn13"));
        assert!(matches!(
            clash.validate(),
            Err(SchemaError::DuplicatePath { .. })
        ));

        let dup = book().with_field(FieldSchema::new("title"));
        assert!(matches!(dup.validate(), Err(SchemaError::DuplicateField { .. })));
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "name": "Book",
            "collection": "books",
            "fields": [
                { "name": "id", "id": true },
                { "name": "discount" }
            ]
        }"#;

        let schema: EntitySchema = serde_json::from_str(json).unwrap();
        let discount = schema.field("discount").unwrap();
        assert!(discount.nullable);
        assert!(!discount.primitive);
        assert!(discount.column.is_none());
        assert!(schema.validate().is_ok());
    }
}
