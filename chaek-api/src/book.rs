use crate::Error;

/// A catalog record as returned by the book search backend. The catalog is an
/// external collaborator; we only ever read these.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub cover_image: String,
    pub published_on: Option<String>,
    pub description: Option<String>,
}

impl Book {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.isbn)?;
        crate::validate_string(&self.title)?;
        crate::validate_string(&self.author)?;
        crate::validate_string(&self.publisher)?;
        crate::validate_string(&self.cover_image)?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Author,
    Isbn,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Isbn => "isbn",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct BookSearch {
    pub query: String,
    pub field: SearchField,
    pub page: u32,
    pub limit: u32,
}

impl BookSearch {
    pub fn titled(query: impl Into<String>) -> BookSearch {
        BookSearch {
            query: query.into(),
            field: SearchField::Title,
            page: 1,
            limit: 20,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct BookSearchPage {
    pub books: Vec<Book>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}
