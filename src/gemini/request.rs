use url::Url;

/// Document served when a request names no resource.
pub const INDEX_DOCUMENT: &str = "index.gmi";

/// A parsed Gemini request line.
///
/// The whole trimmed line is kept as the request URL. No scheme or host
/// checks are made; only the final path segment matters for resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The trimmed request line, e.g. `gemini://localhost/page.gmi`
    pub line: String,
    /// File name looked up under the content directory
    pub resource: String,
}

impl Request {
    pub fn new(line: &str) -> Self {
        let line = line.trim();
        Self {
            line: line.to_string(),
            resource: resource_name(line).to_string(),
        }
    }

    /// The request line as a URL, if it parses as one. Only used for logging.
    pub fn url(&self) -> Option<Url> {
        Url::parse(&self.line).ok()
    }

    /// Host named in the request line, if any.
    pub fn host(&self) -> Option<String> {
        self.url()
            .and_then(|url| url.host_str().map(str::to_string))
    }
}

/// Derives the resource name from a request line.
///
/// Everything up to the last `/` is discarded, so `gemini://host/sub/page.gmi`
/// and `page.gmi` name the same file. An empty last segment means the index
/// document.
///
/// ```
/// # use gemserve::gemini::request::resource_name;
/// assert_eq!(resource_name("gemini://localhost/"), "index.gmi");
/// assert_eq!(resource_name("gemini://localhost/sub/page.gmi"), "page.gmi");
/// ```
pub fn resource_name(line: &str) -> &str {
    match line.rsplit('/').next() {
        Some(last) if !last.is_empty() => last,
        _ => INDEX_DOCUMENT,
    }
}
