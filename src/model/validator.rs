//! Definition validation: identifiers, type tokens, uniqueness and reference closure.

use crate::case::{pluralize, to_camel_case, to_kebab_case, to_pascal_case};
use crate::error::ModelError;
use crate::model::{LoadedDefinition, Primitive};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("identifier pattern"));

/// Entity and field names must start with a letter and contain only letters, digits, `_` or `-`.
pub fn validate_identifier(kind: &'static str, name: &str) -> Result<(), ModelError> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(ModelError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}

/// Parsed form of a declared type token: `[ref:]Name[[]]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeToken<'a> {
    pub name: &'a str,
    pub explicit_ref: bool,
    pub collection: bool,
}

impl TypeToken<'_> {
    /// Primitive kind, unless the token is an explicit reference or names no primitive.
    pub fn primitive(&self) -> Option<Primitive> {
        if self.explicit_ref {
            None
        } else {
            Primitive::from_token(self.name)
        }
    }
}

/// Returns `None` when the token is empty or its name is not an identifier.
pub fn parse_type_token(token: &str) -> Option<TypeToken<'_>> {
    let mut rest = token.trim();
    let collection = match rest.strip_suffix("[]") {
        Some(r) => {
            rest = r.trim_end();
            true
        }
        None => false,
    };
    let explicit_ref = match rest.strip_prefix("ref:") {
        Some(r) => {
            rest = r.trim_start();
            true
        }
        None => false,
    };
    if !IDENTIFIER.is_match(rest) {
        return None;
    }
    Some(TypeToken {
        name: rest,
        explicit_ref,
        collection,
    })
}

/// Check every definition before models are built. Runs two passes: names and tokens
/// first, then every deferred reference against the full set of loaded entity names.
/// Distinct models must also pluralize differently, since the plural names endpoints
/// and reverse accessors.
pub fn validate(definitions: &[LoadedDefinition]) -> Result<(), ModelError> {
    let mut model_names = HashSet::new();
    let mut plurals: HashMap<String, String> = HashMap::new();
    let mut deferred = Vec::new();

    for loaded in definitions {
        let def = &loaded.definition;
        validate_identifier("model", &def.name)?;
        let model = to_pascal_case(&def.name);
        if !model_names.insert(model.clone()) {
            return Err(ModelError::DuplicateModel { name: model });
        }
        let plural = pluralize(&to_kebab_case(&def.name));
        if let Some(other) = plurals.insert(plural.clone(), model.clone()) {
            return Err(ModelError::PluralCollision {
                model,
                other,
                plural,
            });
        }

        let mut field_names = HashSet::new();
        for (raw, decl) in &def.fields {
            validate_identifier("field", raw)?;
            let field = to_camel_case(raw);
            if !field_names.insert(field.clone()) {
                return Err(ModelError::DuplicateField { model, field });
            }
            let token = parse_type_token(decl.token()).ok_or_else(|| ModelError::InvalidType {
                model: model.clone(),
                field: field.clone(),
                token: decl.token().to_string(),
            })?;
            if token.primitive().is_none() {
                deferred.push((model.clone(), field, token.name));
            }
        }
    }

    for (model, field, target) in deferred {
        if !model_names.contains(&to_pascal_case(target)) {
            return Err(ModelError::UnresolvedReference {
                model,
                field,
                target: target.to_string(),
            });
        }
    }
    Ok(())
}
