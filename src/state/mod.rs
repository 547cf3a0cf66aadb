mod editor_state;

pub use editor_state::{
    ActiveTarget,
    EditorState,
    Phase,
    MAX_RESIZE_PERCENT,
    MIN_RESIZE_PERCENT,
};
