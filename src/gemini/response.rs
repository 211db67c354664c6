use bytes::Bytes;

/// Content type sent with every successful response.
pub const GEMINI_MIME: &str = "text/gemini";

/// Gemini status codes produced by the server.
///
/// - `Success` (20): the body follows the header
/// - `NotFound` (51): the resource does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 20
    Success,
    /// 51
    NotFound,
}

impl Status {
    /// Returns the two-digit status code.
    ///
    /// ```
    /// # use gemserve::gemini::response::Status;
    /// assert_eq!(Status::Success.code(), 20);
    /// assert_eq!(Status::NotFound.code(), 51);
    /// ```
    pub fn code(&self) -> u8 {
        match self {
            Status::Success => 20,
            Status::NotFound => 51,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }
}

/// A response ready to be written to a client.
///
/// A body exists exactly when the status is [`Status::Success`]; the
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: Status,
    meta: String,
    body: Option<Bytes>,
}

impl Response {
    /// A `20` response carrying the given body.
    pub fn success(meta: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status: Status::Success,
            meta: meta.into(),
            body: Some(body.into()),
        }
    }

    /// A `20 text/gemini` response.
    pub fn gemini(body: impl Into<Bytes>) -> Self {
        Self::success(GEMINI_MIME, body)
    }

    /// A `51 Not Found` response with no body.
    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            meta: "Not Found".to_string(),
            body: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn meta(&self) -> &str {
        &self.meta
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// The status line, `<code> <meta>\r\n`.
    pub fn header(&self) -> String {
        format!("{} {}\r\n", self.status.code(), self.meta)
    }
}
