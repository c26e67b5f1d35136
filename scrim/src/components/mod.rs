pub mod alert;
pub mod loading;
pub mod refresher_content;

pub use alert::{
    Alert, AlertButton, AlertInput, AlertInputType, AlertOptions, ButtonHandler, HandlerOutcome,
    InputHandler,
};
pub use loading::{Loading, LoadingOptions};
pub use refresher_content::{RefresherContent, RefresherContentOptions};
