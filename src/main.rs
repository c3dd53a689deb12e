use itertools::Itertools;
use log::info;
use region_redact::output::{write_geojson, Output, SelectionLog};
use region_redact::{
    extract_visible_polygons, hide_features, load_geojson, request_redaction, FeatureCollection,
    HttpTransport, LoadOptions, LocalTransport, MapScene, RedactionOptions, ScreenPosition,
    SelectionTracker, Transport,
};
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use structopt::StructOpt;

fn parse_threshold(src: &str) -> Result<u32, String> {
    match src.parse::<u32>() {
        Ok(0) => Err("the threshold must be positive".into()),
        Ok(k) => Ok(k),
        Err(err) => Err(err.to_string()),
    }
}

fn parse_position(src: &str) -> Result<ScreenPosition, String> {
    let mut parts = src.splitn(2, ',');
    let mut coordinate = || -> Result<f64, String> {
        let part = parts.next().ok_or("expected LON,LAT")?;
        part.trim().parse().map_err(|_| format!("invalid coordinate: {}", part))
    };
    let lon = coordinate()?;
    let lat = coordinate()?;
    Ok(ScreenPosition::new(lon, lat))
}

#[derive(StructOpt, Debug)]
#[structopt(
    name = "region_redact",
    about = "Select map regions and request redaction decisions for them"
)]
enum Opts {
    /// Ask the redaction service which of the visible regions to hide
    Redact {
        /// Minimum group size, regions below it are identifying
        #[structopt(short, long, env = "REDACT_K_THRESHOLD", default_value = "30", parse(try_from_str = parse_threshold))]
        k_threshold: u32,
        /// Redaction service URL
        #[structopt(short, long, env = "REDACT_ENDPOINT", default_value = "http://localhost:8000/clean")]
        endpoint: String,
        /// Decide in-process by region compactness instead of calling the service
        #[structopt(long)]
        local: bool,
        /// Request timeout in seconds
        #[structopt(long)]
        timeout: Option<u64>,
        /// Scene time at which time-varying geometry is evaluated
        #[structopt(long, default_value = "0")]
        time: f64,
        /// Write the regions that stay visible as GeoJSON instead of the hidden ids
        #[structopt(long)]
        geojson: bool,
        /// GeoJSON files, one layer each
        #[structopt(parse(from_os_str), required = true)]
        files: Vec<PathBuf>,
    },
    /// Replay clicks on the map and print the resulting selection events
    Inspect {
        /// Click position as LON,LAT, may be repeated
        #[structopt(short, long = "click", number_of_values = 1, allow_hyphen_values = true, parse(try_from_str = parse_position))]
        clicks: Vec<ScreenPosition>,
        /// Scene time at which properties are evaluated
        #[structopt(long, default_value = "0")]
        time: f64,
        /// GeoJSON files, one layer each
        #[structopt(parse(from_os_str), required = true)]
        files: Vec<PathBuf>,
    },
}

fn load_layers(files: &[PathBuf]) -> Result<Vec<FeatureCollection>, Box<dyn Error>> {
    let options = LoadOptions::default();
    let mut layers = vec![];
    for file in files {
        layers.push(load_geojson(file, &options)?);
    }
    Ok(layers)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let opts = Opts::from_args();
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match opts {
        Opts::Redact {
            k_threshold,
            endpoint,
            local,
            timeout,
            time,
            geojson,
            files,
        } => {
            let mut layers = load_layers(&files)?;
            let transport: Box<dyn Transport> = match (local, timeout) {
                (true, _) => Box::new(LocalTransport),
                (false, Some(secs)) => Box::new(HttpTransport::with_timeout(Duration::from_secs(secs))?),
                (false, None) => Box::new(HttpTransport::new()?),
            };
            let options = RedactionOptions {
                k_threshold,
                endpoint,
            };
            let result = request_redaction(transport.as_ref(), &layers, time, &options)?;
            info!(
                "hiding {} regions: {}",
                result.ids_to_hide.len(),
                result.ids_to_hide.iter().join(", ")
            );

            if geojson {
                hide_features(&mut layers, &result.ids_to_hide);
                let visible = extract_visible_polygons(&layers, time);
                write_geojson(&visible, &mut handle)?;
            } else {
                result.write_json_lines(&mut handle)?;
            }
        }
        Opts::Inspect {
            clicks,
            time,
            files,
        } => {
            let mut scene = MapScene::new(load_layers(&files)?);
            scene.time = time;
            let mut tracker = SelectionTracker::new(SelectionLog::default());
            for click in clicks {
                tracker.handle_click(&mut scene, click);
            }
            tracker.listener().write_json_lines(&mut handle)?;
        }
    }
    Ok(())
}
