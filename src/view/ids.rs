//! Element ids and data attributes of the page template.
//!
//! The markup renderer targets these exactly; a host page must use the same names.

pub const FILTER_INPUT: &str = "q";
pub const CONSOLE_SELECT: &str = "console";
pub const PAGE_SIZE_SELECT: &str = "page_size";
pub const LIST: &str = "list";
pub const PAGINATION: &str = "pagination";
pub const SUMMARY: &str = "summary";
pub const SCROLL_TOP: &str = "scrollTopBtn";

pub const VERSIONS_MODAL: &str = "versionsModal";
pub const VERSIONS_MODAL_LABEL: &str = "versionsModalLabel";
pub const VERSIONS_CONTAINER: &str = "versionsContainer";
pub const VERSIONS_PAGINATION: &str = "versionsPagination";
pub const INSTRUCTIONS_MODAL: &str = "instructionsModal";

pub const NAME_INPUT: &str = "gameName";
pub const HASH_INPUT: &str = "searchTerm";
pub const SEARCH_RESULTS: &str = "searchResults";
pub const NAME_MODE: &str = "nameSearchMode";
pub const HASH_MODE: &str = "hashSearchMode";
pub const NAME_FORM: &str = "nameSearchForm";
pub const HASH_FORM: &str = "hashSearchForm";
pub const STATUS: &str = "status";
pub const STATUS_WRAPPER: &str = "statusWrapper";
pub const SPINNER: &str = "spinner";

pub const DATA_PAGE: &str = "data-page";
pub const DATA_VPAGE: &str = "data-vpage";
pub const DATA_GAME_ID: &str = "data-game-id";
pub const DATA_HASH: &str = "data-hash";
pub const DATA_NAME: &str = "data-name";
pub const DATA_VERSIONS: &str = "data-versions";
pub const DATA_ACTION: &str = "data-action";

pub const CLASS_VERSION_OPTION: &str = "version-option";
pub const CLASS_SEARCH_RESULT: &str = "search-result-item";
pub const CLASS_MODAL_OVERLAY: &str = "modal-overlay";
