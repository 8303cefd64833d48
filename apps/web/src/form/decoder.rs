//! Form decoder: rebuilds a nested `Resume` from flat form fields.
//!
//! Scalar fields map one-to-one (`name`, `config.color`, ...). Collection fields
//! use indexed keys such as `experience[2].title`; all keys sharing an index are
//! merged into one entry and entries come out in ascending index order, whatever
//! order the browser submitted them in.
//!
//! Keys that match neither shape, and indices that are not plain decimal
//! numbers fitting in `usize`, are ignored. When a key repeats, the last value wins.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::{Education, Experience, Resume};

static EXPERIENCE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^experience\[(\d+)\]\.(title|company|date|description)$")
        .expect("experience key pattern is valid")
});

static EDUCATION_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^education\[(\d+)\]\.(degree|school|date)$")
        .expect("education key pattern is valid")
});

/// Flat form fields in submission order. Repeated keys are kept so that
/// lookups can resolve them last-wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Last submitted value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Decodes every text field of a resume. The avatar is not a text field and is
/// resolved by the caller.
pub fn decode_resume(fields: &FormFields) -> Resume {
    let mut resume = Resume {
        name: fields.text("name"),
        email: fields.text("email"),
        phone: fields.text("phone"),
        summary: fields.text("summary"),
        ..Resume::default()
    };

    resume.config.template = fields.text("config.template");
    resume.config.color = fields.text("config.color");
    resume.config.font = fields.text("config.font");
    resume.config.font_size = fields.text("config.font_size");
    resume.config.paper_size = fields.text("config.paper_size");

    resume.experience = decode_indexed(fields, &EXPERIENCE_KEY, assign_experience);
    resume.education = decode_indexed(fields, &EDUCATION_KEY, assign_education);

    resume
}

fn assign_experience(entry: &mut Experience, field: &str, value: &str) {
    let slot = match field {
        "title" => &mut entry.title,
        "company" => &mut entry.company,
        "date" => &mut entry.date,
        "description" => &mut entry.description,
        _ => return,
    };
    *slot = value.to_string();
}

fn assign_education(entry: &mut Education, field: &str, value: &str) {
    let slot = match field {
        "degree" => &mut entry.degree,
        "school" => &mut entry.school,
        "date" => &mut entry.date,
        _ => return,
    };
    *slot = value.to_string();
}

/// Groups `collection[index].field` keys by index and returns one merged entry
/// per distinct index, ascending.
fn decode_indexed<T, F>(fields: &FormFields, pattern: &Regex, mut assign: F) -> Vec<T>
where
    T: Default,
    F: FnMut(&mut T, &str, &str),
{
    let mut entries: BTreeMap<usize, T> = BTreeMap::new();

    for (key, value) in fields.iter() {
        let Some(caps) = pattern.captures(key) else {
            continue;
        };
        // Digits only, but may still overflow usize.
        let Ok(index) = caps[1].parse::<usize>() else {
            continue;
        };
        assign(entries.entry(index).or_default(), &caps[2], value);
    }

    entries.into_values().collect()
}
