//! Static device information counter.

use afps_common::Rgba;
use std::fmt::Write;
use tracing::debug;

use super::{Counter, CounterCore, CounterKind};
use crate::config::DeviceCounterConfig;
use crate::host::DeviceInfo;
use crate::markup::{open_tag, CLOSE, NEW_LINE};

/// Shows CPU, GPU, RAM and screen details. The text only changes on refresh.
#[derive(Debug, Clone)]
pub struct DeviceInfoCounter {
    core: CounterCore,
    cpu_model: bool,
    gpu_model: bool,
    ram_size: bool,
    screen_data: bool,
    info: DeviceInfo,
}

impl DeviceInfoCounter {
    /// Creates an inactive counter from its configuration.
    #[must_use]
    pub fn new(config: &DeviceCounterConfig) -> Self {
        Self {
            core: CounterCore::new(config.enabled, config.anchor, config.color),
            cpu_model: config.cpu_model,
            gpu_model: config.gpu_model,
            ram_size: config.ram_size,
            screen_data: config.screen_data,
            info: DeviceInfo::default(),
        }
    }

    /// Whether at least one line is switched on.
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.cpu_model || self.gpu_model || self.ram_size || self.screen_data
    }

    /// Stores the device description used for the next fragment.
    pub fn load(&mut self, info: DeviceInfo) {
        self.info = info;
    }

    /// Device description currently shown.
    #[must_use]
    pub const fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Forced update: re-reads the description and rebuilds the fragment,
    /// activating or deactivating when the set of lines changed.
    pub fn refresh(&mut self, info: DeviceInfo, renders: bool) {
        if !self.core.enabled() {
            return;
        }
        self.info = info;
        let active = self.core.is_active();
        if !active && self.has_data() {
            self.activate(renders);
        } else if active && !self.has_data() {
            self.deactivate();
        } else if active {
            self.core.mark_dirty();
            if renders {
                self.format();
            }
        }
    }

    fn format(&mut self) {
        let info = &self.info;
        let mut lines: Vec<String> = Vec::with_capacity(4);

        if self.cpu_model {
            lines.push(format!("CPU: {} [{} cores]", info.cpu_model, info.cpu_cores));
        }
        if self.gpu_model {
            let mut line = format!("GPU: {}, API: {}", info.gpu_model, info.gpu_api);
            if let Some(sm) = info.gpu_shader_model {
                let _ = write!(line, ", SM: {}.{}", sm / 10, sm % 10);
            }
            if let Some(vram) = info.vram_mb {
                let _ = write!(line, ", VRAM: {vram} MB");
            }
            lines.push(line);
        }
        if self.ram_size {
            lines.push(format!("RAM: {} MB", info.ram_mb));
        }
        if self.screen_data {
            let mut line = format!("SCR: {}x{}", info.screen_width, info.screen_height);
            if let Some(dpi) = info.screen_dpi {
                let _ = write!(line, ", DPI: {dpi:.0}");
            }
            lines.push(line);
        }

        let open = open_tag(self.core.color());
        let text = self.core.text_mut();
        text.clear();
        text.push_str(&open);
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                text.push(NEW_LINE);
            }
            text.push_str(line);
        }
        text.push_str(CLOSE);
    }

    /// Whether the CPU line is shown.
    #[must_use]
    pub const fn cpu_model(&self) -> bool {
        self.cpu_model
    }

    /// Shows or hides the CPU line.
    pub fn set_cpu_model(&mut self, show: bool) {
        if self.cpu_model == show || !self.core.is_live() {
            return;
        }
        self.cpu_model = show;
        self.core.request_refresh();
    }

    /// Whether the GPU line is shown.
    #[must_use]
    pub const fn gpu_model(&self) -> bool {
        self.gpu_model
    }

    /// Shows or hides the GPU line.
    pub fn set_gpu_model(&mut self, show: bool) {
        if self.gpu_model == show || !self.core.is_live() {
            return;
        }
        self.gpu_model = show;
        self.core.request_refresh();
    }

    /// Whether the RAM line is shown.
    #[must_use]
    pub const fn ram_size(&self) -> bool {
        self.ram_size
    }

    /// Shows or hides the RAM line.
    pub fn set_ram_size(&mut self, show: bool) {
        if self.ram_size == show || !self.core.is_live() {
            return;
        }
        self.ram_size = show;
        self.core.request_refresh();
    }

    /// Whether the screen line is shown.
    #[must_use]
    pub const fn screen_data(&self) -> bool {
        self.screen_data
    }

    /// Shows or hides the screen line.
    pub fn set_screen_data(&mut self, show: bool) {
        if self.screen_data == show || !self.core.is_live() {
            return;
        }
        self.screen_data = show;
        self.core.request_refresh();
    }
}

impl Counter for DeviceInfoCounter {
    fn kind(&self) -> CounterKind {
        CounterKind::Device
    }

    fn core(&self) -> &CounterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CounterCore {
        &mut self.core
    }

    fn activate(&mut self, renders: bool) {
        if !self.core.enabled() || !self.has_data() || self.core.is_active() {
            return;
        }
        self.core.activate();
        if renders {
            self.format();
            self.core.mark_dirty();
        }
        debug!("Device info counter activated");
    }

    fn deactivate(&mut self) {
        if !self.core.is_active() {
            return;
        }
        self.core.deactivate();
        debug!("Device info counter deactivated");
    }

    fn set_color(&mut self, color: Rgba) {
        if self.core.replace_color(color) {
            self.core.request_refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::strip_markup;

    fn info() -> DeviceInfo {
        DeviceInfo {
            cpu_model: "Ryzen 7".to_string(),
            cpu_cores: 16,
            gpu_model: "RTX 3070".to_string(),
            gpu_api: "Vulkan 1.3".to_string(),
            gpu_shader_model: Some(50),
            vram_mb: Some(8192),
            ram_mb: 32768,
            screen_width: 2560,
            screen_height: 1440,
            screen_dpi: Some(109.0),
        }
    }

    fn active(config: &DeviceCounterConfig) -> DeviceInfoCounter {
        let mut counter = DeviceInfoCounter::new(config);
        counter.core.set_live(true);
        counter.load(info());
        counter.activate(true);
        counter
    }

    #[test]
    fn test_full_fragment() {
        let counter = active(&DeviceCounterConfig::default());
        assert_eq!(
            strip_markup(counter.core.text()),
            "CPU: Ryzen 7 [16 cores]\n\
             GPU: RTX 3070, API: Vulkan 1.3, SM: 5.0, VRAM: 8192 MB\n\
             RAM: 32768 MB\n\
             SCR: 2560x1440, DPI: 109"
        );
        assert!(counter.core.text().starts_with("<color=#acacacff><b>CPU"));
    }

    #[test]
    fn test_optional_gpu_fields_omitted() {
        let config = DeviceCounterConfig {
            cpu_model: false,
            ram_size: false,
            screen_data: false,
            ..DeviceCounterConfig::default()
        };
        let mut counter = DeviceInfoCounter::new(&config);
        counter.core.set_live(true);
        counter.load(DeviceInfo {
            gpu_model: "Soft".to_string(),
            gpu_api: "GL".to_string(),
            ..DeviceInfo::default()
        });
        counter.activate(true);
        assert_eq!(strip_markup(counter.core.text()), "GPU: Soft, API: GL");
    }

    #[test]
    fn test_refresh_toggles_activation() {
        let mut counter = active(&DeviceCounterConfig::default());
        counter.set_cpu_model(false);
        counter.set_gpu_model(false);
        counter.set_ram_size(false);
        counter.set_screen_data(false);
        counter.refresh(info(), true);
        assert!(!counter.core.is_active());

        counter.set_ram_size(true);
        counter.refresh(info(), true);
        assert!(counter.core.is_active());
        assert_eq!(strip_markup(counter.core.text()), "RAM: 32768 MB");
    }
}
