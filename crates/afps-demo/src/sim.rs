//! Simulated host: frame workload, memory growth and a fixed device.

use afps_hud::{DeviceInfo, MemoryProbe, MemoryReading};
use std::cell::{Cell, RefCell};
use std::time::Duration;

const MB: u64 = 1_048_576;

/// Produces frame times around a target with jitter and occasional spikes.
#[derive(Debug)]
pub struct Workload {
    rng: fastrand::Rng,
    base_ms: u64,
    /// Extra milliseconds added while a heavy phase runs
    load_ms: u64,
}

impl Workload {
    /// Frames take about `base_ms`.
    pub fn new(base_ms: u64, seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            base_ms,
            load_ms: 0,
        }
    }

    /// Adds a constant extra cost per frame.
    pub fn set_load(&mut self, load_ms: u64) {
        self.load_ms = load_ms;
    }

    /// Next frame duration.
    pub fn next_frame(&mut self) -> Duration {
        let jitter = self.rng.u64(0..=self.base_ms / 2);
        let spike = if self.rng.u8(0..100) < 3 {
            self.rng.u64(20..60)
        } else {
            0
        };
        Duration::from_millis(self.base_ms + jitter + spike + self.load_ms)
    }
}

/// Memory that grows slowly and is occasionally collected.
#[derive(Debug)]
pub struct SimulatedMemory {
    rng: RefCell<fastrand::Rng>,
    allocated: Cell<u64>,
}

impl SimulatedMemory {
    /// Starts with `allocated_mb` in use.
    pub fn new(allocated_mb: u64, seed: u64) -> Self {
        Self {
            rng: RefCell::new(fastrand::Rng::with_seed(seed)),
            allocated: Cell::new(allocated_mb * MB),
        }
    }
}

impl MemoryProbe for SimulatedMemory {
    fn read(&self) -> MemoryReading {
        let mut rng = self.rng.borrow_mut();
        let mut allocated = self.allocated.get() + rng.u64(0..4 * MB);
        if rng.u8(0..10) == 0 {
            allocated = allocated * 3 / 4;
        }
        self.allocated.set(allocated);

        MemoryReading {
            total_reserved: allocated + allocated / 2,
            total_allocated: allocated,
            managed: allocated / 5,
        }
    }
}

/// Device description for the demo host.
pub fn device_info() -> DeviceInfo {
    let cores = std::thread::available_parallelism().map_or(1, |n| n.get() as u32);
    DeviceInfo {
        cpu_model: format!("{} CPU", std::env::consts::ARCH),
        cpu_cores: cores,
        gpu_model: "Headless".to_string(),
        gpu_api: "None".to_string(),
        gpu_shader_model: None,
        vram_mb: None,
        ram_mb: 16_384,
        screen_width: 1920,
        screen_height: 1080,
        screen_dpi: Some(96.0),
    }
}
