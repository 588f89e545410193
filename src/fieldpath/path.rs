//! Path element and path types.

use std::fmt;

/// PathElement represents one level of path navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Field name for map/struct fields.
    FieldName(String),
    /// Associative-list key, kept in the store's textual form (`name="app"`).
    Key(String),
    /// Index for list elements.
    Index(usize),
}

impl PathElement {
    /// Creates a new field name path element.
    pub fn field_name(name: impl Into<String>) -> Self {
        PathElement::FieldName(name.into())
    }

    /// Creates a new key path element.
    pub fn key(raw: impl Into<String>) -> Self {
        PathElement::Key(raw.into())
    }

    /// Creates a new index path element.
    pub fn index(i: usize) -> Self {
        PathElement::Index(i)
    }

    /// Returns the field name if this is a field name element.
    pub fn as_field_name(&self) -> Option<&str> {
        match self {
            PathElement::FieldName(name) => Some(name),
            _ => None,
        }
    }
}

/// Path represents a complete path to a nested field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Path {
            elements: Vec::new(),
        }
    }

    /// Creates a path from a vector of elements.
    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Path { elements }
    }

    /// Parses the textual field form reported by the store.
    ///
    /// Accepts `metadata.annotations`, `.spec.containers[0].image` and
    /// `.spec.containers[name="app"]`. Parsing never fails: bracket contents
    /// that are not an index become a [`PathElement::Key`], and an unterminated
    /// bracket is kept verbatim as a key.
    pub fn parse(s: &str) -> Self {
        let mut elements = Vec::new();
        let mut chars = s.trim().chars();
        let mut name = String::new();

        fn flush(name: &mut String, elements: &mut Vec<PathElement>) {
            if !name.is_empty() {
                elements.push(PathElement::FieldName(std::mem::take(name)));
            }
        }

        while let Some(c) = chars.next() {
            match c {
                '.' => flush(&mut name, &mut elements),
                '[' => {
                    flush(&mut name, &mut elements);
                    let mut inner = String::new();
                    let mut in_quotes = false;
                    let mut closed = false;
                    for c in chars.by_ref() {
                        match c {
                            '"' => {
                                in_quotes = !in_quotes;
                                inner.push(c);
                            }
                            ']' if !in_quotes => {
                                closed = true;
                                break;
                            }
                            _ => inner.push(c),
                        }
                    }
                    let element = match inner.parse::<usize>() {
                        Ok(i) if closed => PathElement::Index(i),
                        _ => PathElement::Key(inner),
                    };
                    elements.push(element);
                }
                _ => name.push(c),
            }
        }
        flush(&mut name, &mut elements);

        Path { elements }
    }

    /// Returns the number of elements in the path.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns an iterator over the path elements.
    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.elements.iter()
    }

    /// Appends a path element.
    pub fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    /// Returns the field names of the path if it contains no keys or indices.
    pub fn field_names(&self) -> Option<Vec<&str>> {
        self.elements.iter().map(PathElement::as_field_name).collect()
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<T: IntoIterator<Item = PathElement>>(iter: T) -> Self {
        Path {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::FieldName(name) => write!(f, ".{}", name),
            PathElement::Key(raw) => write!(f, "[{}]", raw),
            PathElement::Index(i) => write!(f, "[{}]", i),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}
