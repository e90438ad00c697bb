//! File and image references

use serde::{Deserialize, Serialize};

/// Kind of stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
	File,
	Image,
}

/// Handle to a stored file
///
/// Converts to its public URL when one is set, otherwise to its storage path.
///
/// # Examples
///
/// ```
/// use simple_serializer_core::FileRef;
///
/// let avatar = FileRef::image("/srv/media/avatars/1.png");
/// assert_eq!(avatar.resolve(), "/srv/media/avatars/1.png");
///
/// let avatar = avatar.with_url("https://cdn.example.com/avatars/1.png");
/// assert_eq!(avatar.resolve(), "https://cdn.example.com/avatars/1.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
	pub kind: FileKind,
	pub path: String,
	pub url: Option<String>,
}

impl FileRef {
	/// Reference a generic file
	pub fn file(path: impl Into<String>) -> Self {
		Self {
			kind: FileKind::File,
			path: path.into(),
			url: None,
		}
	}

	/// Reference an image
	pub fn image(path: impl Into<String>) -> Self {
		Self {
			kind: FileKind::Image,
			path: path.into(),
			url: None,
		}
	}

	/// Set the public URL
	pub fn with_url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());
		self
	}

	/// URL if set and non-empty, else the path
	pub fn resolve(&self) -> &str {
		match self.url.as_deref() {
			Some(url) if !url.is_empty() => url,
			_ => &self.path,
		}
	}
}
