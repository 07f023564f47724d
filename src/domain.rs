use std::io::Error;

// Crate wide error type. Fetch errors keep their kind so callers can log
// them even when the user facing behavior stays "empty panel".
#[derive(Debug)]
pub enum LVError {
    IoError(Error),
    HttpError(reqwest::Error),
    JsonError(serde_json::Error),
    FetchFailed(String),
}

impl From<Error> for LVError {
    fn from(err: Error) -> Self {
        LVError::IoError(err)
    }
}

impl From<reqwest::Error> for LVError {
    fn from(err: reqwest::Error) -> Self {
        LVError::HttpError(err)
    }
}

impl From<serde_json::Error> for LVError {
    fn from(err: serde_json::Error) -> Self {
        LVError::JsonError(err)
    }
}

#[derive(Debug, Clone)]
pub struct LVConfig {
    pub endpoint: String,
    pub event_poll_time: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    Open,
    OpenAndHide,
    TogglePanel,
    Help,
    Exit,
    Resize(usize, usize),
}

// The original interface sizes the panel in em units so it scales with
// the text size. One terminal row corresponds to 1.5em.
pub const EM_PER_ROW: f64 = 1.5;
pub const PANEL_PADDING_EM: f64 = 0.7;
pub const COLLAPSED_PANEL_EM: f64 = 1.5;

pub const DEFAULT_ENDPOINT: &str = "http://localhost/~ross/web_interface/list.json";

pub const HELP_TEXT: &str = "
 Up/k, Down/j     move selection
 PgUp, PgDown     move selection by a page
 Home/g, End/G    jump to first/last entry
 Enter            load entry content
 o                load entry content and hide the panel
 Tab              show/hide the panel
 ?                this help
 Esc              close help
 q                quit
";
