use crate::runtime::command::Command;
use crate::runtime::event::AppEvent;
use crate::runtime::key_bindings::KeyBindings;
use crate::runtime::scheduler::Scheduler;
use crate::terminal::{CursorPos, MouseEvent, MouseKind, Terminal, TerminalEvent};
use crate::ui::frame::RenderFrame;
use crate::ui::span::SpanLine;
use crate::widgets::traits::{InteractionResult, InteractiveNode, RenderContext};
use std::io;
use std::time::{Duration, Instant};
use tracing::debug;

const IDLE_TICK: Duration = Duration::from_millis(120);

/// Event loop hosting a single interactive widget below a static header.
pub struct Runtime {
    terminal: Terminal,
    scheduler: Scheduler,
    key_bindings: KeyBindings,
    widget: Box<dyn InteractiveNode>,
    header: Vec<SpanLine>,
    ticks: TickClock,
    focused: bool,
    should_exit: bool,
}

impl Runtime {
    pub fn new(widget: Box<dyn InteractiveNode>, terminal: Terminal) -> Self {
        Self {
            terminal,
            scheduler: Scheduler::new(),
            key_bindings: KeyBindings::new(),
            widget,
            header: Vec::new(),
            ticks: TickClock::new(IDLE_TICK, Instant::now()),
            focused: false,
            should_exit: false,
        }
    }

    pub fn with_header(mut self, header: Vec<SpanLine>) -> Self {
        self.header = header;
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        self.terminal.enter()?;

        let run_result = (|| -> io::Result<()> {
            self.set_focus(true)?;
            self.render()?;

            while !self.should_exit {
                self.process_scheduled_events()?;

                let now = Instant::now();
                let timeout = self.scheduler.poll_timeout(now, IDLE_TICK);
                let event = self.terminal.poll_event(timeout)?;

                self.dispatch_app_event(AppEvent::Terminal(event))?;

                if self.ticks.due(Instant::now()) {
                    self.process_command(Command::Tick)?;
                }
            }

            Ok(())
        })();

        let exit_result = self.terminal.exit();
        run_result.and(exit_result)?;
        self.terminal.print_last_frame()
    }

    fn process_scheduled_events(&mut self) -> io::Result<()> {
        for event in self.scheduler.drain_ready(Instant::now()) {
            self.dispatch_app_event(event)?;
        }
        Ok(())
    }

    fn dispatch_app_event(&mut self, event: AppEvent) -> io::Result<()> {
        match event {
            AppEvent::Terminal(TerminalEvent::Resize(size)) => {
                self.terminal.set_size(size);
                self.render()
            }
            AppEvent::Terminal(TerminalEvent::Key(key)) => {
                let command = self
                    .key_bindings
                    .resolve(key)
                    .unwrap_or(Command::InputKey(key));
                self.process_command(command)
            }
            AppEvent::Terminal(TerminalEvent::Mouse(mouse)) => self.dispatch_mouse(mouse),
            // Ticks are paced by `TickClock`, not by idle polls.
            AppEvent::Terminal(TerminalEvent::Tick) => Ok(()),
            other => {
                let result = self.widget.on_app_event(&other);
                self.apply_result(result)
            }
        }
    }

    fn process_command(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Exit => {
                debug!("exit requested");
                self.should_exit = true;
                Ok(())
            }
            Command::ToggleFocus => self.set_focus(!self.focused),
            Command::InputKey(key) => {
                let result = self.widget.on_key(key);
                self.apply_result(result)
            }
            Command::Tick => {
                let result = self.widget.on_tick();
                self.apply_result(result)
            }
        }
    }

    fn dispatch_mouse(&mut self, mouse: MouseEvent) -> io::Result<()> {
        let Some(local) = widget_local(mouse, self.header.len()) else {
            return Ok(());
        };
        // The widget focuses itself on click.
        if local.kind == MouseKind::LeftDown {
            self.focused = true;
        }
        let result = self.widget.on_mouse(local);
        self.apply_result(result)
    }

    fn set_focus(&mut self, focused: bool) -> io::Result<()> {
        self.focused = focused;
        let result = if focused {
            self.widget.on_focus()
        } else {
            self.widget.on_blur()
        };
        self.apply_result(result)
    }

    fn apply_result(&mut self, result: InteractionResult) -> io::Result<()> {
        let now = Instant::now();
        for command in result.commands {
            self.scheduler.schedule(command, now);
        }
        if result.request_render {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let frame = compose_frame(&self.header, self.widget.as_ref(), self.focused);
        self.terminal.render(&frame)
    }
}

/// Fires at most once per `interval`, whether the loop woke on a timeout or
/// on a stream of terminal events.
#[derive(Debug, Clone, Copy)]
struct TickClock {
    interval: Duration,
    last: Instant,
}

impl TickClock {
    fn new(interval: Duration, now: Instant) -> Self {
        Self { interval, last: now }
    }

    fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) < self.interval {
            return false;
        }
        self.last = now;
        true
    }
}

/// Header lines followed by the widget, with the widget cursor shifted below the header.
pub fn compose_frame(
    header: &[SpanLine],
    widget: &dyn InteractiveNode,
    focused: bool,
) -> RenderFrame {
    let ctx = RenderContext {
        focused_id: focused.then(|| widget.id().to_string()),
    };
    let mut frame = RenderFrame::default();
    for line in header {
        frame.push_line(line.clone());
    }
    let offset = frame.row_count();
    for line in widget.draw(&ctx).lines {
        frame.push_line(line);
    }
    frame.cursor = widget
        .cursor_pos()
        .filter(|_| focused)
        .map(|pos| CursorPos {
            col: pos.col,
            row: pos.row.saturating_add(offset),
        });
    frame
}

/// Screen coordinates to widget coordinates, or `None` over the header.
pub fn widget_local(event: MouseEvent, header_rows: usize) -> Option<MouseEvent> {
    let header_rows = header_rows.min(u16::MAX as usize) as u16;
    let row = event.row.checked_sub(header_rows)?;
    Some(MouseEvent { row, ..event })
}
