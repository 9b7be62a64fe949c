/// The filter core: three multipliers, a bound source image and a backend
/// that turns them into a filtered image.

use std::sync::Arc;

use tracing::debug;

use crate::error::{ParameterError, RenderError};
use crate::state::data::{FilteredImage, SourceImage};
use crate::state::params::{Channel, FilterParameters};

/// Something that can run the HSL kernel over an image
pub trait FilterBackend: Send + Sync {
    /// Short name for logs and the status line
    fn name(&self) -> &str;

    /// Produce a new image of the same dimensions as `source`
    fn render(&self, source: &SourceImage, params: &FilterParameters) -> Result<FilteredImage, RenderError>;
}

impl<B: FilterBackend + ?Sized> FilterBackend for Arc<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn render(&self, source: &SourceImage, params: &FilterParameters) -> Result<FilteredImage, RenderError> {
        (**self).render(source, params)
    }
}

/// HSL filter bound to one backend
pub struct HslFilter<B> {
    backend: B,
    params: FilterParameters,
    input: Option<Arc<SourceImage>>,
}

impl<B: FilterBackend> HslFilter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            params: FilterParameters::default(),
            input: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Bind the image to filter; the image is shared, not copied
    pub fn set_input(&mut self, image: Arc<SourceImage>) {
        self.input = Some(image);
    }

    /// Unbind the input; `output_image` then yields nothing
    pub fn clear_input(&mut self) {
        self.input = None;
    }

    pub fn input(&self) -> Option<&Arc<SourceImage>> {
        self.input.as_ref()
    }

    pub fn parameters(&self) -> &FilterParameters {
        &self.params
    }

    pub fn parameters_mut(&mut self) -> &mut FilterParameters {
        &mut self.params
    }

    pub fn set_parameter(&mut self, channel: Channel, value: f32) -> Result<(), ParameterError> {
        self.params.set(channel, value)
    }

    /// Render the bound input with the current parameters.
    ///
    /// Returns `Ok(None)` when no input is bound. A failed render leaves the
    /// filter untouched so the caller can keep showing its last good image.
    pub fn output_image(&self) -> Result<Option<FilteredImage>, RenderError> {
        let Some(input) = self.input.as_deref() else {
            return Ok(None);
        };

        let output = render_checked(&self.backend, input, &self.params)?;
        Ok(Some(output))
    }
}

impl<B: FilterBackend + Clone> HslFilter<B> {
    /// Snapshot of everything a render needs, for running off the UI thread.
    /// `None` when no input is bound.
    pub fn job(&self) -> Option<RenderJob<B>> {
        let input = self.input.clone()?;
        Some(RenderJob {
            backend: self.backend.clone(),
            input,
            params: self.params,
        })
    }
}

/// A render request detached from the filter
#[derive(Debug, Clone)]
pub struct RenderJob<B> {
    backend: B,
    input: Arc<SourceImage>,
    params: FilterParameters,
}

impl<B: FilterBackend> RenderJob<B> {
    pub fn params(&self) -> &FilterParameters {
        &self.params
    }

    /// Blocking render of the snapshot
    pub fn run(self) -> Result<FilteredImage, RenderError> {
        render_checked(&self.backend, &self.input, &self.params)
    }
}

impl<B: FilterBackend> std::fmt::Debug for HslFilter<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HslFilter")
            .field("backend", &self.backend.name())
            .field("params", &self.params)
            .field("input", &self.input.as_ref().map(|i| i.dimensions()))
            .finish()
    }
}

/// Run a backend and make sure it kept the source dimensions
pub fn render_checked<B: FilterBackend + ?Sized>(
    backend: &B,
    source: &SourceImage,
    params: &FilterParameters,
) -> Result<FilteredImage, RenderError> {
    debug!(
        backend = backend.name(),
        width = source.width(),
        height = source.height(),
        hue = params.hue,
        saturation = params.saturation,
        lightness = params.lightness,
        "rendering"
    );

    let output = backend.render(source, params)?;
    if output.dimensions() != source.dimensions() {
        return Err(RenderError::SizeMismatch {
            width: source.width(),
            height: source.height(),
            actual_width: output.width(),
            actual_height: output.height(),
        });
    }
    Ok(output)
}
