//! distribution summaries for comparing lists of distances
//!
//! [`Histogram`] uses equal width bins between the smallest and largest
//! value. the last bin is closed on the right so the maximum value is always
//! counted.
/// basic description of a list of values
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl Summary {
    /// returns None if there are no finite values to summarize
    pub fn new(values: &[f64]) -> Option<Self> {
        let mut count = 0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut total = 0.0;

        for value in values.iter().filter(|v| v.is_finite()) {
            count += 1;
            min = min.min(*value);
            max = max.max(*value);
            total += value;
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            count,
            min,
            max,
            mean: total / count as f64,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    min: f64,
    max: f64,
    counts: Vec<usize>,
}

impl Histogram {
    /// bins the finite values of the list. returns None if there are no
    /// finite values or no bins were requested
    pub fn new(values: &[f64], bins: usize) -> Option<Self> {
        if bins == 0 {
            return None;
        }

        let summary = Summary::new(values)?;
        let width = (summary.max - summary.min) / bins as f64;
        let mut counts = vec![0; bins];

        for value in values.iter().filter(|v| v.is_finite()) {
            // a zero width range puts everything into the first bin
            let index = if width > 0.0 {
                ((value - summary.min) / width).floor() as usize
            } else {
                0
            };

            counts[index.min(bins - 1)] += 1;
        }

        Some(Self {
            min: summary.min,
            max: summary.max,
            counts,
        })
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// lower and upper edge of the given bin
    pub fn edges(&self, bin: usize) -> (f64, f64) {
        let width = (self.max - self.min) / self.counts.len() as f64;
        let low = self.min + width * bin as f64;

        if bin + 1 == self.counts.len() {
            (low, self.max)
        } else {
            (low, self.min + width * (bin + 1) as f64)
        }
    }

    /// renders the histogram as text with one line per bin. the longest bar
    /// will be `width` characters
    pub fn render(&self, width: usize) -> String {
        let largest = self.counts().iter().copied().max().unwrap_or(0);
        let mut rtn = String::new();

        for (bin, count) in self.counts().iter().enumerate() {
            let (low, high) = self.edges(bin);
            let close = if bin + 1 == self.counts.len() { ']' } else { ')' };
            let bar = if largest == 0 {
                0
            } else {
                (count * width).div_ceil(largest)
            };

            rtn.push_str(&format!(
                "[{low:>12.4}, {high:>12.4}{close} {count:>10} {}\n",
                "#".repeat(bar)
            ));
        }

        rtn
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn summary_of_values() {
        let summary = Summary::new(&[3.0, 5.0, 4.0, 0.0]).unwrap();

        assert_eq!(
            summary,
            Summary {
                count: 4,
                min: 0.0,
                max: 5.0,
                mean: 3.0,
            }
        );
    }

    #[test]
    fn summary_skips_non_finite() {
        let summary = Summary::new(&[f64::NAN, 2.0, f64::INFINITY]).unwrap();

        assert_eq!(summary.count, 1);
        assert_eq!(summary.mean, 2.0);
        assert_eq!(Summary::new(&[]), None);
    }

    #[test]
    fn histogram_equal_width_bins() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];

        let histogram = Histogram::new(&values, 5).unwrap();

        // the maximum lands in the last bin instead of a sixth one
        assert_eq!(histogram.counts(), &[2, 2, 2, 2, 3]);
        assert_eq!(histogram.edges(0), (0.0, 2.0));
        assert_eq!(histogram.edges(4), (8.0, 10.0));
        assert_eq!(histogram.counts().iter().sum::<usize>(), values.len());
    }

    #[test]
    fn histogram_degenerate_range() {
        let histogram = Histogram::new(&[4.0, 4.0, 4.0], 3).unwrap();

        assert_eq!(histogram.counts(), &[3, 0, 0]);
        assert_eq!(Histogram::new(&[1.0], 0), None);
        assert_eq!(Histogram::new(&[], 10), None);
    }

    #[test]
    fn render_scales_bars() {
        let histogram = Histogram::new(&[0.0, 0.0, 0.0, 0.0, 1.0], 2).unwrap();

        let rendered = histogram.render(8);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" 4 ########"));
        assert!(lines[1].ends_with(" 1 ##"));
        assert!(lines[1].contains(']'));
    }
}
