use crate::classification_session::core::Event;
use crate::device_display::interface::{DeviceDisplay, Preview};
use crate::frame::Frame;
use crate::photo_picker::interface::PickSource;
use eframe::egui;
use std::error::Error;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Default)]
struct Screen {
    label: String,
    accuracy: String,
    image: Option<Frame>,
    preview: Option<Preview>,
}

/// Render target backed by a buffer that [`GuiWindow`] paints every frame.
#[derive(Clone, Default)]
pub struct DeviceDisplayGui {
    screen: Arc<Mutex<Screen>>,
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the window that shows this display and forwards button presses as events.
    pub fn window(&self, event_sender: Sender<Event>) -> GuiWindow {
        GuiWindow {
            screen: self.screen.clone(),
            event_sender,
            texture: None,
        }
    }

    fn with_screen<R>(&self, f: impl FnOnce(&mut Screen) -> R) -> R {
        let mut screen = self.screen.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut screen)
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn set_label(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_screen(|screen| screen.label = text.to_string());
        Ok(())
    }

    fn set_accuracy(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_screen(|screen| screen.accuracy = text.to_string());
        Ok(())
    }

    fn set_image(&mut self, frame: Option<&Frame>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_screen(|screen| screen.image = frame.cloned());
        Ok(())
    }

    fn set_preview(&mut self, preview: Option<&Preview>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_screen(|screen| screen.preview = preview.cloned());
        Ok(())
    }

    fn preview_surface_count(&self) -> usize {
        self.with_screen(|screen| usize::from(screen.preview.is_some()))
    }
}

pub struct GuiWindow {
    screen: Arc<Mutex<Screen>>,
    event_sender: Sender<Event>,
    texture: Option<(u64, egui::TextureHandle)>,
}

impl GuiWindow {
    fn texture_for(&mut self, ctx: &egui::Context, frame: &Frame) -> egui::TextureHandle {
        if let Some((id, texture)) = &self.texture {
            if *id == frame.id {
                return texture.clone();
            }
        }

        let rgba = frame.upright().to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        let texture = ctx.load_texture(
            format!("frame-{}", frame.id),
            color_image,
            egui::TextureOptions::default(),
        );

        self.texture = Some((frame.id, texture.clone()));
        texture
    }

    fn send(&self, event: Event) {
        // The session is gone only while the app shuts down.
        let _ = self.event_sender.send(event);
    }
}

impl eframe::App for GuiWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint_after(Duration::from_millis(33));

        let (label, accuracy, shown_frame, live) = {
            let screen = self.screen.lock().unwrap_or_else(PoisonError::into_inner);
            let shown_frame = match &screen.preview {
                Some(preview) => preview.latest_frame.clone(),
                None => screen.image.clone(),
            };
            (
                screen.label.clone(),
                screen.accuracy.clone(),
                shown_frame,
                screen.preview.is_some(),
            )
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);

                let max_side = ui.available_width().min(ui.available_height() - 160.0).max(64.0);
                match &shown_frame {
                    Some(frame) => {
                        let texture = self.texture_for(ctx, frame);
                        let [w, h] = texture.size();
                        let scale = max_side / (w.max(h) as f32);
                        let size = egui::vec2(w as f32 * scale, h as f32 * scale);
                        ui.add(egui::Image::new((texture.id(), size)));
                    }
                    None => {
                        let (rect, _) = ui.allocate_exact_size(
                            egui::vec2(max_side, max_side),
                            egui::Sense::hover(),
                        );
                        ui.painter()
                            .rect_filled(rect, 4.0, egui::Color32::from_rgb(40, 40, 40));
                    }
                }

                ui.add_space(12.0);
                ui.label(egui::RichText::new(label).size(24.0).strong());
                ui.label(egui::RichText::new(accuracy).size(18.0));
                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    if ui.button("Take Photo").clicked() {
                        self.send(Event::PickRequested(PickSource::Camera));
                    }
                    if ui.button("Choose Photo").clicked() {
                        self.send(Event::PickRequested(PickSource::Library));
                    }
                    let toggle = if live { "Stop Scan" } else { "Live Scan" };
                    if ui.button(toggle).clicked() {
                        self.send(Event::LiveToggled);
                    }
                });
            });
        });
    }
}
