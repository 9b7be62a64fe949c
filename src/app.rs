/// The filter window: image view, three sliders and a status line
///
/// Every slider event updates the filter parameters and starts one render on
/// the blocking pool. Results carry the ticket they were issued with and only
/// the newest one is shown.

use std::sync::Arc;

use iced::widget::{column, container, image, text};
use iced::{ContentFit, Element, Length, Task, Theme};
use tracing::{debug, error, info, warn};

use crate::color::CpuReference;
use crate::config;
use crate::error::RenderError;
use crate::filter::{FilterBackend, HslFilter, RenderJob};
use crate::gpu;
use crate::state::data::{FilteredImage, SourceImage};
use crate::state::params::{slider_to_multiplier, Channel};
use crate::state::sequence::RenderSequence;
use crate::ui;

/// Backend shared between the UI and background renders
pub type SharedBackend = Arc<dyn FilterBackend>;

/// Main application state
pub struct FilterDemo {
    /// Filter core: multipliers, bound source image, backend
    filter: HslFilter<SharedBackend>,
    /// Image currently on screen
    display: image::Handle,
    /// Orders background renders so only the newest is shown
    sequence: RenderSequence,
    /// Reported once if the GPU could not be set up
    backend_note: Option<String>,
    /// Last render failure, cleared by the next success
    last_error: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// A slider moved; raw position in 0..1
    SliderChanged(Channel, f32),
    /// Put every slider back at its midpoint
    Reset,
    /// A background render finished
    Rendered(u64, Result<FilteredImage, RenderError>),
}

impl FilterDemo {
    /// Show the unfiltered source and bind it to the filter
    pub fn new(source: SourceImage, backend: SharedBackend, backend_note: Option<String>) -> (Self, Task<Message>) {
        let source = Arc::new(source);
        let display = source.to_handle();

        let mut filter = HslFilter::new(backend);
        filter.set_input(source);

        info!(
            backend = filter.backend().name(),
            params = ?filter.parameters(),
            "🎨 HSL filter initialized"
        );

        (
            FilterDemo {
                filter,
                display,
                sequence: RenderSequence::new(),
                backend_note,
                last_error: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SliderChanged(channel, raw) => {
                let multiplier = slider_to_multiplier(raw);
                if let Err(e) = self.filter.set_parameter(channel, multiplier) {
                    warn!(error = %e, "ignoring slider value");
                    return Task::none();
                }
                self.request_render()
            }
            Message::Reset => {
                self.filter.parameters_mut().reset();
                self.request_render()
            }
            Message::Rendered(ticket, result) => {
                if !self.sequence.accept(ticket) {
                    debug!(ticket, latest = self.sequence.latest(), "discarding stale render");
                    return Task::none();
                }

                match result {
                    Ok(filtered) => {
                        self.display = filtered.into_handle();
                        self.last_error = None;
                    }
                    Err(e) => {
                        // Keep showing the previous image
                        warn!(error = %e, "render failed");
                        self.last_error = Some(e.to_string());
                    }
                }
                Task::none()
            }
        }
    }

    /// Start a background render of the current parameters
    fn request_render(&mut self) -> Task<Message> {
        let Some(job) = self.filter.job() else {
            return Task::none();
        };

        let ticket = self.sequence.issue();
        Task::perform(render_in_background(job), move |result| Message::Rendered(ticket, result))
    }

    /// Build the user interface
    pub fn view(&self) -> Element<Message> {
        let picture = image(self.display.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill);

        let status = match (&self.last_error, &self.backend_note) {
            (Some(e), _) => format!("⚠️ {}", e),
            (None, Some(note)) => format!("{} (rendering on {})", note, self.filter.backend().name()),
            (None, None) => format!("Rendering on {}", self.filter.backend().name()),
        };

        let content = column![
            picture,
            ui::controls::sliders(self.filter.parameters()),
            text(status).size(14),
        ]
        .spacing(20)
        .padding(24);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Run a render job on the blocking pool so the UI thread stays responsive
async fn render_in_background(job: RenderJob<SharedBackend>) -> Result<FilteredImage, RenderError> {
    tokio::task::spawn_blocking(move || job.run())
        .await
        .map_err(|e| RenderError::Dispatch(format!("render task failed: {}", e)))?
}

/// Pick the GPU pipeline, falling back to the CPU reference when the GPU
/// can't be set up. The second value is a note for the status line.
pub fn select_backend(args: &config::Args) -> (SharedBackend, Option<String>) {
    if args.cpu {
        info!("GPU disabled on the command line");
        return (Arc::new(CpuReference), Some("GPU disabled".to_string()));
    }

    match gpu::HslPipeline::new_blocking(args.power.preference()) {
        Ok(pipeline) => {
            info!(adapter = pipeline.adapter_name(), "using GPU backend");
            (Arc::new(pipeline), None)
        }
        Err(e) => {
            error!(error = %e, "GPU unavailable, falling back to CPU");
            (Arc::new(CpuReference), Some(format!("GPU unavailable: {}", e)))
        }
    }
}
