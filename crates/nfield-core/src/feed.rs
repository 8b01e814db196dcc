//! External stimulus primitives: direct, ranged, strided, and randomized
//! feeds, plus the windowed sampling feed used to drive a field from a
//! slowly-varying external signal (e.g. sensor input) rather than per-tick
//! literal values.
//!
//! All five range feeds address a contiguous `[start, start+count)` window
//! in row-major order and fail silently (no mutation, logs a warning) if
//! that range exceeds `width * height`. The random variants draw from the
//! field's own `feed_rng` stream, separate from the deterministic per-cell
//! tick stream, so repeated feed calls consume fresh entropy without
//! perturbing a tick's reproducibility.

use log::warn;

use crate::field::{Field, PulseMapping};

impl Field {
    fn cell_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    fn in_range(&self, start: usize, count: usize) -> bool {
        match start.checked_add(count) {
            Some(end) => end <= self.cell_count(),
            None => false,
        }
    }

    fn draw_below(&mut self, max: i16) -> i16 {
        if max <= 0 {
            return 0;
        }
        (self.feed_rng.next_u32() % (max as u32)) as i16
    }

    /// Add `values[i]` to the `i`-th neuron in `[start, start+count)`.
    /// Returns `false` and logs a warning if the range is out of bounds or
    /// `values` is shorter than `count`; no neuron is touched in that case.
    pub fn feed(&mut self, start: usize, count: usize, values: &[i16]) -> bool {
        if values.len() < count {
            warn!("feed: only {} values supplied for count {count}", values.len());
            return false;
        }
        if !self.in_range(start, count) {
            warn!("feed: range {start}..{} out of range for {} cells", start + count, self.cell_count());
            return false;
        }
        for (neuron, value) in self.neurons[start..start + count].iter_mut().zip(values) {
            neuron.value = neuron.value.saturating_add(*value);
        }
        true
    }

    /// Add constant `v` to every neuron in `[start, start+count)`. Returns
    /// `false` and logs a warning if the range is out of bounds.
    pub fn dfeed(&mut self, start: usize, count: usize, v: i16) -> bool {
        if !self.in_range(start, count) {
            warn!("dfeed: range {start}..{} out of range for {} cells", start + count, self.cell_count());
            return false;
        }
        for neuron in &mut self.neurons[start..start + count] {
            neuron.value = neuron.value.saturating_add(v);
        }
        true
    }

    /// Add `rand() % max` to every neuron in `[start, start+count)`, each
    /// cell drawing its own word from the field's `feed_rng`. Returns
    /// `false` and logs a warning if the range is out of bounds.
    pub fn rfeed(&mut self, start: usize, count: usize, max: i16) -> bool {
        if !self.in_range(start, count) {
            warn!("rfeed: range {start}..{} out of range for {} cells", start + count, self.cell_count());
            return false;
        }
        for i in start..start + count {
            let delta = self.draw_below(max);
            self.neurons[i].value = self.neurons[i].value.saturating_add(delta);
        }
        true
    }

    /// Add `v` to every `spread`-th neuron starting at `start`, within
    /// `[start, start+count)`. Returns `false` and logs a warning if the
    /// range is out of bounds or `spread` is zero.
    pub fn sfeed(&mut self, start: usize, count: usize, v: i16, spread: usize) -> bool {
        if spread == 0 {
            warn!("sfeed: spread must be nonzero");
            return false;
        }
        if !self.in_range(start, count) {
            warn!("sfeed: range {start}..{} out of range for {} cells", start + count, self.cell_count());
            return false;
        }
        for i in (start..start + count).step_by(spread) {
            self.neurons[i].value = self.neurons[i].value.saturating_add(v);
        }
        true
    }

    /// Same as [`Field::sfeed`] but the added value is `rand() % max`
    /// rather than a constant. Returns `false` and logs a warning if the
    /// range is out of bounds or `spread` is zero.
    pub fn rsfeed(&mut self, start: usize, count: usize, max: i16, spread: usize) -> bool {
        if spread == 0 {
            warn!("rsfeed: spread must be nonzero");
            return false;
        }
        if !self.in_range(start, count) {
            warn!("rsfeed: range {start}..{} out of range for {} cells", start + count, self.cell_count());
            return false;
        }
        for i in (start..start + count).step_by(spread) {
            let delta = self.draw_below(max);
            self.neurons[i].value = self.neurons[i].value.saturating_add(delta);
        }
        true
    }

    /// Sample a rectangular sub-region `(x0, y0)..(x1, y1)` of external
    /// stimulus values, mapping each `input` onto a pulse pattern over the
    /// field's `sample_window` sub-cycle rather than a single literal
    /// value: `sample_step` identifies which sub-step of the window this
    /// call represents, and a cell only receives `exc_value` for the
    /// sub-steps its input and the configured [`PulseMapping`] select.
    ///
    /// `exc_value` is taken as an explicit argument rather than read from
    /// the field's own [`Field::set_exc_value`] setting, so a caller can
    /// drive a subregion at a different magnitude than the rest of the
    /// field.
    ///
    /// `inputs` is row-major over the sampled rectangle, width
    /// `x1.saturating_sub(x0)`. Out-of-range rectangles are clipped to the
    /// field's dimensions rather than rejected outright.
    pub fn sample_sqfeed(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        sample_step: u32,
        inputs: &[i16],
        exc_value: i16,
    ) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        if x0 >= x1 || y0 >= y1 {
            warn!("sample_sqfeed: empty or inverted rectangle ({x0},{y0})..({x1},{y1})");
            return;
        }
        let rect_width = usize::from(x1 - x0);
        let sample_window = self.sample_window;
        let mapping = self.pulse_mapping;

        for y in y0..y1 {
            for x in x0..x1 {
                let flat = (usize::from(y - y0)) * rect_width + usize::from(x - x0);
                let Some(&input) = inputs.get(flat) else {
                    continue;
                };
                if fires_this_step(mapping, sample_step, input, sample_window) {
                    let idx = self.index(x, y);
                    self.neurons[idx].value = self.neurons[idx].value.saturating_add(exc_value);
                }
            }
        }
    }
}

fn fires_this_step(mapping: PulseMapping, sample_step: u32, input: i16, sample_window: u32) -> bool {
    if input <= 0 || sample_window <= 1 {
        return false;
    }
    let input = input as u32;
    match mapping {
        PulseMapping::Linear => sample_step < input,
        PulseMapping::FastProportional => {
            (sample_step.wrapping_mul(input)) % (sample_window - 1) < input
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldConfig;

    #[test]
    fn test_feed_adds_values_across_range() {
        let mut field = Field::init(FieldConfig::new(4, 4)).unwrap();
        assert!(field.feed(5, 3, &[1, 2, 3]));
        assert_eq!(field.neurons()[5].value, 1);
        assert_eq!(field.neurons()[6].value, 2);
        assert_eq!(field.neurons()[7].value, 3);
    }

    #[test]
    fn test_feed_accumulates_on_existing_value() {
        let mut field = Field::init(FieldConfig::new(4, 4)).unwrap();
        assert!(field.feed(0, 1, &[10]));
        assert!(field.feed(0, 1, &[5]));
        assert_eq!(field.neurons()[0].value, 15);
    }

    #[test]
    fn test_feed_out_of_range_is_noop() {
        let mut field = Field::init(FieldConfig::new(4, 4)).unwrap();
        assert!(!field.feed(15, 2, &[1, 2]));
        assert!(field.neurons().iter().all(|n| n.value == 0));
    }

    #[test]
    fn test_feed_rejects_short_values() {
        let mut field = Field::init(FieldConfig::new(4, 4)).unwrap();
        assert!(!field.feed(0, 3, &[1, 2]));
        assert!(field.neurons().iter().all(|n| n.value == 0));
    }

    #[test]
    fn test_dfeed_adds_constant_across_whole_range() {
        let mut field = Field::init(FieldConfig::new(4, 4)).unwrap();
        assert!(field.dfeed(2, 3, 5));
        assert!(field.neurons()[0..2].iter().all(|n| n.value == 0));
        assert!(field.neurons()[2..5].iter().all(|n| n.value == 5));
        assert!(field.dfeed(2, 3, 5));
        assert!(field.neurons()[2..5].iter().all(|n| n.value == 10));
    }

    #[test]
    fn test_rfeed_adds_bounded_random_values() {
        let mut field = Field::init(FieldConfig::new(4, 4)).unwrap();
        assert!(field.rfeed(2, 4, 7));
        assert!(field.neurons()[0..2].iter().all(|n| n.value == 0));
        assert!(field.neurons()[2..6].iter().all(|n| (0..7).contains(&n.value)));
    }

    #[test]
    fn test_rfeed_rejects_overrun_without_partial_writes() {
        let mut field = Field::init(FieldConfig::new(4, 4)).unwrap();
        assert!(!field.rfeed(14, 4, 7));
        assert!(field.neurons().iter().all(|n| n.value == 0));
    }

    #[test]
    fn test_sfeed_touches_only_every_spread_th_cell() {
        let mut field = Field::init(FieldConfig::new(1, 8)).unwrap();
        assert!(field.sfeed(0, 6, 9, 2));
        assert_eq!(field.neurons()[0].value, 9);
        assert_eq!(field.neurons()[1].value, 0);
        assert_eq!(field.neurons()[2].value, 9);
        assert_eq!(field.neurons()[3].value, 0);
        assert_eq!(field.neurons()[4].value, 9);
        assert_eq!(field.neurons()[5].value, 0);
    }

    #[test]
    fn test_sfeed_rejects_zero_spread() {
        let mut field = Field::init(FieldConfig::new(4, 4)).unwrap();
        assert!(!field.sfeed(0, 4, 9, 0));
    }

    #[test]
    fn test_rsfeed_touches_only_every_spread_th_cell_with_bounded_values() {
        let mut field = Field::init(FieldConfig::new(1, 8)).unwrap();
        assert!(field.rsfeed(0, 6, 5, 3));
        assert!((0..5).contains(&field.neurons()[0].value));
        assert_eq!(field.neurons()[1].value, 0);
        assert_eq!(field.neurons()[2].value, 0);
        assert!((0..5).contains(&field.neurons()[3].value));
    }

    #[test]
    fn test_sample_sqfeed_linear_mapping() {
        let mut field = Field::init(FieldConfig::new(4, 4)).unwrap();
        field.set_sample_window(10);
        field.set_pulse_mapping(PulseMapping::Linear);
        let inputs = [5i16];
        let exc_value = field.exc_value();

        field.sample_sqfeed(0, 0, 1, 1, 3, &inputs, exc_value);
        let value_at_step_3 = field.neurons()[0].value;
        assert!(value_at_step_3 > 0, "step below input should fire");

        let mut field2 = Field::init(FieldConfig::new(4, 4)).unwrap();
        field2.set_sample_window(10);
        field2.set_pulse_mapping(PulseMapping::Linear);
        let exc_value2 = field2.exc_value();
        field2.sample_sqfeed(0, 0, 1, 1, 7, &inputs, exc_value2);
        assert_eq!(field2.neurons()[0].value, 0, "step at/above input should not fire");
    }

    #[test]
    fn test_sample_sqfeed_uses_explicit_exc_value() {
        let mut field = Field::init(FieldConfig::new(4, 4)).unwrap();
        field.set_sample_window(10);
        field.set_pulse_mapping(PulseMapping::Linear);
        let inputs = [5i16];

        field.sample_sqfeed(0, 0, 1, 1, 3, &inputs, 99);
        assert_eq!(field.neurons()[0].value, 99);
    }
}
