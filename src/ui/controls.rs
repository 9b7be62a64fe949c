/// Slider panel: one labelled slider per HSL channel plus a reset button
use iced::widget::{button, column, row, slider, text, Column};
use iced::{Alignment, Element, Length};

use crate::state::params::{multiplier_to_slider, Channel, FilterParameters};
use crate::app::Message;

/// Slider resolution over the 0..1 range
const SLIDER_STEP: f32 = 0.001;

/// One row per channel, in `Channel::ALL` order
pub fn sliders(params: &FilterParameters) -> Element<'static, Message> {
    let mut rows: Column<'static, Message> = column![].spacing(12);

    for channel in Channel::ALL {
        let multiplier = params.get(channel);
        rows = rows.push(
            row![
                text(channel.label()).width(Length::Fixed(100.0)),
                slider(0.0..=1.0, multiplier_to_slider(multiplier), move |raw| {
                    Message::SliderChanged(channel, raw)
                })
                .step(SLIDER_STEP)
                .width(Length::Fill),
                text(format!("×{:.2}", multiplier)).width(Length::Fixed(60.0)),
            ]
            .spacing(16)
            .align_y(Alignment::Center),
        );
    }

    rows.push(button("Reset").on_press(Message::Reset).padding(8)).into()
}
