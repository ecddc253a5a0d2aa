//! Conversion between wire types and stored documents.
//!
//! Stored students look like
//! `{ _id, name: <string>, age: <int>, address: { city?, country? } }`.
//! Reading is strict about `name` and `age`: a document without them means
//! the collection holds something this service did not write, and that is
//! reported as a [`MappingError`] rather than papered over.

use bson::{Bson, Document, doc};
use thiserror::Error;

use crate::model::{Address, Student, StudentSummary, UpdateStudent};

pub const NAME: &str = "name";
pub const AGE: &str = "age";
pub const ADDRESS: &str = "address";
pub const CITY: &str = "city";
pub const COUNTRY: &str = "country";

/// Path of the country inside the embedded address, for filtering.
pub const ADDRESS_COUNTRY: &str = "address.country";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("stored student is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("stored student field `{field}` is not {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

/// The update request carried no fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No fields provided to update")]
pub struct EmptyUpdate;

pub fn to_document(student: &Student) -> Document {
    doc! {
        NAME: student.name.as_str(),
        AGE: student.age,
        ADDRESS: address_document(&student.address),
    }
}

pub fn from_document(document: &Document) -> Result<Student, MappingError> {
    let address = match document.get(ADDRESS) {
        None | Some(Bson::Null) => Address::default(),
        Some(Bson::Document(address)) => Address {
            city: optional_str(address, CITY, "address.city")?,
            country: optional_str(address, COUNTRY, ADDRESS_COUNTRY)?,
        },
        Some(_) => {
            return Err(MappingError::WrongType {
                field: ADDRESS,
                expected: "an embedded document",
            });
        }
    };

    Ok(Student {
        name: required_str(document, NAME)?,
        age: required_int(document, AGE)?,
        address,
    })
}

/// Builds the `$set` mapping for a partial update from the fields the client
/// actually sent. An empty-string name is a value and is kept.
pub fn to_partial_update(update: &UpdateStudent) -> Result<Document, EmptyUpdate> {
    let mut set = Document::new();

    if let Some(name) = &update.name {
        set.insert(NAME, name.as_str());
    }
    if let Some(age) = update.age {
        set.insert(AGE, age);
    }
    if let Some(address) = &update.address {
        set.insert(ADDRESS, address_document(address));
    }

    if set.is_empty() {
        return Err(EmptyUpdate);
    }

    Ok(set)
}

pub fn project_summary(document: &Document) -> Result<StudentSummary, MappingError> {
    Ok(StudentSummary {
        name: required_str(document, NAME)?,
        age: required_int(document, AGE)?,
    })
}

// Unset address fields are left out of the document rather than stored as null.
fn address_document(address: &Address) -> Document {
    let mut document = Document::new();

    if let Some(city) = &address.city {
        document.insert(CITY, city.as_str());
    }
    if let Some(country) = &address.country {
        document.insert(COUNTRY, country.as_str());
    }

    document
}

fn required_str(document: &Document, field: &'static str) -> Result<String, MappingError> {
    match document.get(field) {
        Some(Bson::String(value)) => Ok(value.clone()),
        None | Some(Bson::Null) => Err(MappingError::MissingField(field)),
        Some(_) => Err(MappingError::WrongType { field, expected: "a string" }),
    }
}

fn required_int(document: &Document, field: &'static str) -> Result<i64, MappingError> {
    match document.get(field) {
        Some(Bson::Int32(value)) => Ok(i64::from(*value)),
        Some(Bson::Int64(value)) => Ok(*value),
        None | Some(Bson::Null) => Err(MappingError::MissingField(field)),
        Some(_) => Err(MappingError::WrongType { field, expected: "an integer" }),
    }
}

fn optional_str(
    document: &Document,
    key: &str,
    field: &'static str,
) -> Result<Option<String>, MappingError> {
    match document.get(key) {
        Some(Bson::String(value)) => Ok(Some(value.clone())),
        None | Some(Bson::Null) => Ok(None),
        Some(_) => Err(MappingError::WrongType { field, expected: "a string" }),
    }
}
