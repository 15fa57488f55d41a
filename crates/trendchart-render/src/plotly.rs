//! Plotly figure serialization.

use serde_json::{json, Value};
use trendchart_core::error::RenderError;
use trendchart_core::traits::ChartRenderer;
use trendchart_core::types::{
    ChartSpec, PriceBar, PriceSeries, TrendChannel, MA_LONG_WINDOW, MA_SHORT_WINDOW,
};
use tracing::debug;

const VERTICAL_SPACING: f64 = 0.03;
const PRICE_ROW_SHARE: f64 = 0.7;

/// Figure dimensions.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Emits a `<div>` plus a `Plotly.newPlot` call per chart.
///
/// The hosting page must load plotly.js; see [`crate::render_page`].
#[derive(Debug, Clone, Default)]
pub struct PlotlyRenderer {
    settings: RenderSettings,
}

impl PlotlyRenderer {
    /// Create a renderer with the given figure size.
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    /// Build the figure description without wrapping it in markup.
    pub fn figure(&self, spec: &ChartSpec<'_>) -> Result<Value, RenderError> {
        self.validate_spec(spec)?;

        let series = spec.series;
        let dates: Vec<String> = series.dates().iter().map(|d| d.to_string()).collect();

        let mut traces = vec![candlestick_trace(series, &dates)];
        if let Some(channel) = spec.channel {
            traces.extend(channel_traces(channel, &dates));
        }
        if spec.show_volume {
            traces.push(json!({
                "type": "bar",
                "name": "Volume",
                "x": dates,
                "y": series.volumes(),
                "xaxis": "x2",
                "yaxis": "y2",
            }));
        }
        for (window, values) in &spec.moving_averages {
            traces.push(json!({
                "type": "scatter",
                "mode": "lines",
                "name": format!("{}-day MA", window),
                "x": dates,
                "y": values,
                "line": {"color": ma_color(*window)},
                "xaxis": "x",
                "yaxis": "y",
            }));
        }

        Ok(json!({
            "data": traces,
            "layout": self.layout(&spec.title, spec.show_volume),
        }))
    }

    fn layout(&self, title: &str, show_volume: bool) -> Value {
        let mut layout = json!({
            "title": {"text": format!("{} Stock Analysis", title)},
            "height": self.settings.height,
            "width": self.settings.width,
            "showlegend": true,
        });

        if !show_volume {
            layout["xaxis"] = json!({"rangeslider": {"visible": false}});
            layout["yaxis"] = json!({"domain": [0.0, 1.0]});
            return layout;
        }

        let usable = 1.0 - VERTICAL_SPACING;
        let volume_top = usable * (1.0 - PRICE_ROW_SHARE);
        let price_bottom = volume_top + VERTICAL_SPACING;

        layout["xaxis"] = json!({
            "anchor": "y",
            "matches": "x2",
            "showticklabels": false,
            "rangeslider": {"visible": false},
        });
        layout["xaxis2"] = json!({
            "anchor": "y2",
            "rangeslider": {"visible": false},
        });
        layout["yaxis"] = json!({"anchor": "x", "domain": [price_bottom, 1.0]});
        layout["yaxis2"] = json!({"anchor": "x2", "domain": [0.0, volume_top]});
        layout["annotations"] = json!([
            subplot_title(&format!("{} Stock Price", title), 1.0),
            subplot_title("Volume", volume_top),
        ]);
        layout
    }
}

fn candlestick_trace(series: &PriceSeries, dates: &[String]) -> Value {
    let column = |f: fn(&PriceBar) -> f64| -> Vec<f64> {
        series.iter().map(f).collect()
    };
    json!({
        "type": "candlestick",
        "name": "Price",
        "x": dates,
        "open": column(|b| b.open),
        "high": column(|b| b.high),
        "low": column(|b| b.low),
        "close": column(|b| b.close),
        "xaxis": "x",
        "yaxis": "y",
    })
}

fn channel_traces(channel: &TrendChannel, dates: &[String]) -> Vec<Value> {
    let line = |name: &str, y: &[f64], style: Value| {
        json!({
            "type": "scatter",
            "mode": "lines",
            "name": name,
            "x": dates,
            "y": y,
            "line": style,
            "xaxis": "x",
            "yaxis": "y",
        })
    };
    vec![
        line("Trendline", &channel.trend, json!({"color": "purple", "width": 2})),
        line(
            "Upper Channel",
            &channel.upper,
            json!({"color": "green", "width": 1, "dash": "dash"}),
        ),
        line(
            "Lower Channel",
            &channel.lower,
            json!({"color": "red", "width": 1, "dash": "dash"}),
        ),
    ]
}

fn ma_color(window: usize) -> &'static str {
    match window {
        MA_SHORT_WINDOW => "orange",
        MA_LONG_WINDOW => "red",
        _ => "gray",
    }
}

fn subplot_title(text: &str, y: f64) -> Value {
    json!({
        "text": text,
        "x": 0.5,
        "y": y,
        "xref": "paper",
        "yref": "paper",
        "xanchor": "center",
        "yanchor": "bottom",
        "showarrow": false,
    })
}

/// Element id derived from the chart title.
///
/// Alphanumerics and `-` pass through; every other byte, `_` included, is
/// written as `_XX` hex, so distinct titles never share an id.
pub fn element_id(title: &str) -> String {
    let mut id = String::from("chart-");
    for b in title.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' {
            id.push(b as char);
        } else {
            id.push_str(&format!("_{:02X}", b));
        }
    }
    id
}

/// JSON that is safe to embed inside a `<script>` element.
fn script_json(value: &Value) -> Result<String, RenderError> {
    let text = serde_json::to_string(value).map_err(|e| RenderError::Serialization(e.to_string()))?;
    Ok(text.replace("</", "<\\/"))
}

impl ChartRenderer for PlotlyRenderer {
    fn render(&self, spec: &ChartSpec<'_>) -> Result<String, RenderError> {
        let figure = self.figure(spec)?;
        let id = element_id(&spec.title);

        let markup = format!(
            "<div id=\"{id}\" class=\"trendchart\" style=\"width:{w}px;height:{h}px;\"></div>\n\
             <script type=\"text/javascript\">Plotly.newPlot(\"{id}\", {data}, {layout}, {{\"responsive\": true}});</script>\n",
            id = id,
            w = self.settings.width,
            h = self.settings.height,
            data = script_json(&figure["data"])?,
            layout = script_json(&figure["layout"])?,
        );

        debug!(chart = %id, bytes = markup.len(), "Rendered chart");
        Ok(markup)
    }

    fn name(&self) -> &str {
        "Plotly"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use trendchart_core::types::MovingAverages;
    use trendchart_indicators::{moving_averages, trend_channel};

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let date = start + chrono::Duration::days(i as i64);
                PriceBar::new(date, c - 0.5, c + 1.0, c - 1.0, c, 1000 + i as u64)
            })
            .collect();
        PriceSeries::new("AAPL", bars).unwrap()
    }

    #[test]
    fn test_figure_traces() {
        let s = series(&[10.0, 8.0, 12.0, 9.0, 13.0]);
        let channel = trend_channel(&s.closes()).unwrap();
        let spec = ChartSpec {
            title: "AAPL".into(),
            series: &s,
            channel: Some(&channel),
            moving_averages: moving_averages(&s.closes(), &[3]).unwrap(),
            show_volume: true,
        };

        let figure = PlotlyRenderer::default().figure(&spec).unwrap();
        let names: Vec<&str> = figure["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["Price", "Trendline", "Upper Channel", "Lower Channel", "Volume", "3-day MA"]
        );

        let ma = &figure["data"][5]["y"];
        assert!(ma[0].is_null());
        assert!((ma[2].as_f64().unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(figure["data"][4]["y"][0], 1000);
        assert_eq!(figure["data"][0]["x"][1], "2024-01-02");
        assert_eq!(figure["layout"]["title"]["text"], "AAPL Stock Analysis");
        assert_eq!(figure["layout"]["annotations"][0]["text"], "AAPL Stock Price");
        assert_eq!(figure["layout"]["xaxis"]["rangeslider"]["visible"], false);
    }

    #[test]
    fn test_ma_colors() {
        assert_eq!(ma_color(20), "orange");
        assert_eq!(ma_color(50), "red");
    }

    #[test]
    fn test_render_markup() {
        let s = series(&[10.0, 11.0]);
        let spec = ChartSpec::candles("TSLA", &s);
        let markup = PlotlyRenderer::default().render(&spec).unwrap();

        assert!(markup.starts_with("<div id=\"chart-TSLA\""));
        assert!(markup.contains("Plotly.newPlot(\"chart-TSLA\""));
        assert!(markup.contains("\"candlestick\""));
        assert!(!markup.contains("Trendline"));
    }

    #[test]
    fn test_render_rejects_misaligned_average() {
        let s = series(&[10.0, 11.0, 12.0]);
        let mut averages = MovingAverages::new();
        averages.insert(20, vec![None, None]);
        let spec = ChartSpec {
            title: "AAPL".into(),
            series: &s,
            channel: None,
            moving_averages: averages,
            show_volume: true,
        };

        let err = PlotlyRenderer::default().render(&spec).unwrap_err();
        assert!(matches!(err, RenderError::LengthMismatch { expected: 3, actual: 2, .. }));
    }

    #[test]
    fn test_element_id_is_sanitized() {
        assert_eq!(element_id("AAPL"), "chart-AAPL");
        assert_eq!(element_id("BRK.B"), "chart-BRK_2EB");
        assert_eq!(element_id("<x>"), "chart-_3Cx_3E");
    }

    #[test]
    fn test_element_id_distinct_for_similar_symbols() {
        let ids = [
            element_id("A.B"),
            element_id("A=B"),
            element_id("A_B"),
            element_id("A-B"),
            element_id("A^B"),
        ];
        for (i, a) in ids.iter().enumerate() {
            assert!(a[6..].chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_script_json_escapes_closing_tags() {
        let text = script_json(&json!({"name": "</script>"})).unwrap();
        assert!(!text.contains("</script>"));
    }
}
