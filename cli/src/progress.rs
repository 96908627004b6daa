//! Progress bar for sweeps.

use kdam::{tqdm, Animation, Bar, BarExt};

pub struct SweepBar {
    bar: Option<Bar>,
    desc: &'static str,
}

impl SweepBar {
    pub fn new(desc: &'static str) -> Self {
        Self { bar: None, desc }
    }

    /// Advance by one; the bar is created on the first item once the total is known.
    pub fn tick(&mut self, total: usize) {
        let desc = self.desc;
        let bar = self.bar.get_or_insert_with(|| {
            tqdm!(total = total, desc = desc, animation = Animation::Classic, unit = " files")
        });
        let _ = bar.update(1);
    }

    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.as_mut() {
            let _ = bar.refresh();
            eprintln!();
        }
    }
}
