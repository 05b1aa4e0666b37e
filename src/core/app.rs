//! Main application orchestrator

use anyhow::{Context, Result};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::Stdout;

use crate::config::Config;
use crate::core::events::{Event, EventHandler, EventResult};
use crate::core::reconcile::{reconcile, seed_disks, Command};
use crate::core::scheduler::{collect_partitions, Scheduler};
use crate::core::state::{AppState, MetricSnapshot};
use crate::integrations::system::{MetricSource, MetricsError, SysinfoSource};
use crate::ui::renderer::Renderer;
use crate::ui::theme::Theme;
use crate::ui::widgets::progress::ProgressUpdate;

/// What the loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub result: EventResult,
    pub redraw: bool,
    pub rearm_tick: bool,
}

/// Event-driven core of the dashboard, independent of the terminal.
pub struct Dashboard {
    state: AppState,
}

impl Dashboard {
    pub fn new(metrics: MetricSnapshot, viewport: (u16, u16)) -> Self {
        Self {
            state: AppState::new(metrics, viewport),
        }
    }

    /// Build the initial state from one partition listing.
    ///
    /// Startup discovery is best effort: failures leave the disk list empty
    /// or partial and the first tick fills it in.
    pub fn discover<S: MetricSource + ?Sized>(source: &mut S, viewport: (u16, u16)) -> Self {
        let mut dashboard = Self::new(MetricSnapshot::default(), viewport);

        match collect_partitions(source) {
            Ok(partitions) => {
                let commands = seed_disks(&mut dashboard.state.metrics, &partitions);
                for command in &commands {
                    dashboard.state.gauges.apply(command);
                }
                tracing::info!(disks = commands.len(), "initial disks discovered");
            }
            Err(err) => tracing::warn!(error = %err, "initial partition listing failed"),
        }

        dashboard
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Set once a fail-fast query has failed.
    pub fn fatal_error(&self) -> Option<&MetricsError> {
        self.state.metrics.last_error.as_ref()
    }

    pub fn handle_event(&mut self, event: Event) -> Dispatch {
        if let Event::Resize(w, h) = event {
            self.state.viewport = (w, h);
        }

        let reconciled = reconcile(&mut self.state.metrics, &event);
        if reconciled.result == EventResult::Quit {
            return Dispatch {
                result: EventResult::Quit,
                redraw: false,
                rearm_tick: false,
            };
        }

        let mut rearm_tick = false;
        for command in &reconciled.commands {
            match command {
                Command::RearmTick => rearm_tick = true,
                other => self.state.gauges.apply(other),
            }
        }

        let animation = self.state.gauges.update(&event);
        let redraw = !matches!(event, Event::Frame) || animation != ProgressUpdate::Idle;

        Dispatch {
            result: EventResult::Continue,
            redraw,
            rearm_tick,
        }
    }
}

pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    dashboard: Dashboard,
    theme: Theme,
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        // Initialize terminal
        let backend = CrosstermBackend::new(std::io::stdout());
        let terminal = Terminal::new(backend)?;
        let size = terminal.size()?;

        let theme = Theme::from_name(&config.display.theme);

        let mut source = SysinfoSource::new();
        let dashboard = Dashboard::discover(&mut source, (size.width, size.height));

        Ok(Self {
            terminal,
            dashboard,
            theme,
            config,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let result = self.run_inner().await;

        // Restore the terminal before any error is printed.
        let restored = self.shutdown();
        result?;
        restored
    }

    async fn run_inner(&mut self) -> Result<()> {
        self.setup_terminal()
            .context("failed to initialise the terminal")?;

        let (mut event_handler, event_tx) = EventHandler::new();
        EventHandler::spawn_sources(event_tx.clone(), self.config.display.frame_interval());
        let scheduler = Scheduler::spawn(&self.config.sampling, event_tx, SysinfoSource::new);

        // Initial render, before any metric has arrived
        self.render()?;

        self.event_loop(&mut event_handler, &scheduler).await
    }

    fn setup_terminal(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            crossterm::cursor::Hide,
        )?;
        self.terminal.clear()?;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show,
        )?;
        Ok(())
    }

    async fn event_loop(
        &mut self,
        event_handler: &mut EventHandler,
        scheduler: &Scheduler,
    ) -> Result<()> {
        while let Some(event) = event_handler.next().await {
            let dispatch = self.dashboard.handle_event(event);

            if let Some(err) = self.dashboard.fatal_error() {
                return Err(anyhow::Error::new(err.clone()).context("metrics refresh failed"));
            }

            match dispatch.result {
                EventResult::Quit => {
                    tracing::info!("quit requested");
                    break;
                }
                EventResult::Continue => {}
            }

            if dispatch.rearm_tick {
                scheduler.rearm_tick();
            }
            if dispatch.redraw {
                self.render()?;
            }
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let state = self.dashboard.state();
        let theme = &self.theme;
        self.terminal.draw(|frame| {
            Renderer::render(frame, state, theme);
        })?;
        Ok(())
    }
}
