/// Multipart field that carries the uploaded file.
pub const UPLOAD_FIELD_NAME: &str = "file";

/// Default upload ceiling in megabytes.
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 5;

/// Route prefix under which stored uploads are served.
pub const DEFAULT_PUBLIC_PATH_PREFIX: &str = "/uploads";

/// Number of leading bytes inspected by the content sniffer.
pub const SNIFF_WINDOW: usize = 64;
