use crate::runtime::event::AppEvent;
use crate::runtime::scheduler::SchedulerCommand;
use crate::terminal::{CursorPos, KeyEvent, MouseEvent};
use crate::ui::span::SpanLine;

// ---------------------------------------------------------------------------
// Render context & output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RenderContext {
    pub focused_id: Option<String>,
}

impl RenderContext {
    pub fn is_focused(&self, id: &str) -> bool {
        self.focused_id.as_deref().is_some_and(|focused| focused == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DrawOutput {
    pub lines: Vec<SpanLine>,
}

// ---------------------------------------------------------------------------
// Drawable
// ---------------------------------------------------------------------------

pub trait Drawable: Send {
    fn id(&self) -> &str;
    fn draw(&self, ctx: &RenderContext) -> DrawOutput;
}

// ---------------------------------------------------------------------------
// InteractionResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct InteractionResult {
    pub handled: bool,
    pub request_render: bool,
    pub commands: Vec<SchedulerCommand>,
}

impl InteractionResult {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn consumed() -> Self {
        Self {
            handled: true,
            request_render: false,
            commands: Vec::new(),
        }
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            request_render: true,
            commands: Vec::new(),
        }
    }

    pub fn with_command(mut self, command: SchedulerCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn merge(&mut self, other: Self) {
        self.handled |= other.handled;
        self.request_render |= other.request_render;
        self.commands.extend(other.commands);
    }
}

// ---------------------------------------------------------------------------
// Interactive
// ---------------------------------------------------------------------------

pub trait Interactive: Send {
    fn on_key(&mut self, key: KeyEvent) -> InteractionResult;

    /// `event` coordinates are relative to the node's first drawn row.
    fn on_mouse(&mut self, _event: MouseEvent) -> InteractionResult {
        InteractionResult::ignored()
    }

    fn on_focus(&mut self) -> InteractionResult {
        InteractionResult::ignored()
    }
    fn on_blur(&mut self) -> InteractionResult {
        InteractionResult::ignored()
    }

    fn on_app_event(&mut self, _event: &AppEvent) -> InteractionResult {
        InteractionResult::ignored()
    }
    /// Called at a steady pace by the runtime, also while input keeps arriving.
    fn on_tick(&mut self) -> InteractionResult {
        InteractionResult::ignored()
    }
    fn cursor_pos(&self) -> Option<CursorPos> {
        None
    }
}

pub trait InteractiveNode: Drawable + Interactive {}
impl<T> InteractiveNode for T where T: Drawable + Interactive {}
