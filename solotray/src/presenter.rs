use async_trait::async_trait;

use crate::{ModeRequest, Result};

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// `Presenter` is the presentation layer that reflects the current mode to the user.
///
/// The consumer loop is the only caller, so implementations never see concurrent calls.
#[async_trait]
pub trait Presenter: Send {
    /// Shows the given indicator.
    async fn present(&mut self, indicator: &Indicator) -> Result<()>;
}

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The icon variant an indicator asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    /// The regular icon.
    Normal,

    /// The icon marking test mode.
    Test,
}

/// What the presentation layer should display for a mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    /// The title text.
    pub title: String,

    /// The tooltip text.
    pub tooltip: String,

    /// The icon variant.
    pub icon: IconKind,
}

/// A presenter that writes each indicator to the log.
#[derive(Debug, Default)]
pub struct LogPresenter;

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Indicator {
    /// Builds the indicator for `mode` under the given application title.
    pub fn for_mode(title: &str, mode: ModeRequest) -> Self {
        match mode {
            ModeRequest::Normal => Self {
                title: title.to_string(),
                tooltip: "Mic Indicator".to_string(),
                icon: IconKind::Normal,
            },
            ModeRequest::Test => Self {
                title: format!("{title} (TEST MODE)"),
                tooltip: "Running in TEST mode".to_string(),
                icon: IconKind::Test,
            },
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl Presenter for LogPresenter {
    async fn present(&mut self, indicator: &Indicator) -> Result<()> {
        tracing::info!(
            title = %indicator.title,
            tooltip = %indicator.tooltip,
            icon = ?indicator.icon,
            "Indicator updated"
        );

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
