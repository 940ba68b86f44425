use crate::model::SeasonSeries;

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 400;
pub const Y_MIN: f64 = 0.0;
pub const Y_MAX: f64 = 10.1;
pub const Y_TICK_STEP: f64 = 2.5;
pub const X_AXIS_LABEL: &str = "Episode";
pub const Y_AXIS_LABEL: &str = "Rating";
pub const MARKER_SIZE: u32 = 5;

/// One plotted line-and-marker series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonPlot {
    pub season: u32,
    pub name: String,
    pub x: Vec<u32>,
    pub y: Vec<f64>,
}

impl SeasonPlot {
    pub fn points(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Renderer-independent description of a ratings chart.
///
/// Episodes are numbered on one global axis: season `i` occupies the
/// positions right after the last episode of season `i - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    display_title: String,
    plots: Vec<SeasonPlot>,
    total_episodes: u32,
}

impl ChartSpec {
    pub fn new(display_title: &str, series: &SeasonSeries) -> Self {
        let mut plots = Vec::with_capacity(series.len());
        let mut episodes = 0u32;

        for (season, ratings) in series.seasons() {
            let count = ratings.len() as u32;
            plots.push(SeasonPlot {
                season,
                name: format!("S{season}"),
                x: (episodes + 1..=episodes + count).collect(),
                y: ratings.to_vec(),
            });
            episodes += count;
        }

        Self {
            display_title: display_title.to_string(),
            plots,
            total_episodes: episodes,
        }
    }

    pub fn display_title(&self) -> &str {
        &self.display_title
    }

    pub fn title(&self) -> String {
        format!("IMDb ratings of {} episodes", self.display_title)
    }

    pub fn plots(&self) -> &[SeasonPlot] {
        &self.plots
    }

    pub fn total_episodes(&self) -> u32 {
        self.total_episodes
    }

    pub fn x_range(&self) -> (u32, u32) {
        (0, self.total_episodes + 1)
    }

    pub fn y_range(&self) -> (f64, f64) {
        (Y_MIN, Y_MAX)
    }

    /// Only the first and the last episode get a tick.
    pub fn x_ticks(&self) -> Vec<u32> {
        let mut ticks = vec![1, self.total_episodes];
        ticks.dedup();
        ticks.retain(|tick| *tick >= 1);
        ticks
    }

    pub fn y_ticks(&self) -> Vec<f64> {
        let steps = (Y_MAX / Y_TICK_STEP).floor() as u32;
        (0..=steps).map(|step| Y_MIN + f64::from(step) * Y_TICK_STEP).collect()
    }
}
