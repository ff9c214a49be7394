use crate::services::Listing;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct FileSystemReadResponse {
    pub files: Vec<String>,
    pub directories: Vec<String>,
}

impl From<Listing> for FileSystemReadResponse {
    fn from(listing: Listing) -> Self {
        Self {
            files: listing.files,
            directories: listing.directories,
        }
    }
}
