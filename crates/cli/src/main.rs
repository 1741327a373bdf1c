mod server;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use facespot_core::detection::domain::detection_client::DetectionClient;
use facespot_core::detection::domain::endpoint::DetectionEndpoint;
use facespot_core::detection::domain::face_detector::FaceDetector;
use facespot_core::detection::domain::face_geometry::DetectionOutcome;
use facespot_core::detection::domain::image_source::ImageSource;
use facespot_core::detection::infrastructure::http_detection_client::HttpDetectionClient;
use facespot_core::detection::infrastructure::http_image_fetcher::HttpImageFetcher;
use facespot_core::detection::infrastructure::onnx_yolo_detector::{
    OnnxYoloDetector, DEFAULT_CONFIDENCE,
};
use facespot_core::overlay::domain::drawing_surface::DrawingSurface;
use facespot_core::overlay::domain::overlay_path::EyeConnector;
use facespot_core::overlay::infrastructure::raster_surface::RasterSurface;
use facespot_core::pipeline::detect_faces_use_case::DetectFacesUseCase;
use facespot_core::shared::constants::{DEFAULT_ORIGIN, YOLO_MODEL_NAME, YOLO_MODEL_URL};
use facespot_core::shared::geometry::Offset;
use facespot_core::shared::image_descriptor::ImageDescriptor;
use facespot_core::shared::model_resolver;
use facespot_core::viewer::overlay_controller::{select_image, ImageLayout, OverlayController};
use facespot_core::viewer::view_state::{Activation, ViewState};

use server::AppState;

/// Face detection service and overlay tools.
#[derive(Parser)]
#[command(name = "facespot", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP face-detection service.
    Serve(ServeArgs),
    /// Ask a detection service about one image and print its JSON reply.
    Detect(DetectArgs),
    /// Draw detected faces onto an image and save it.
    Annotate(AnnotateArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Directory served under /static.
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Directory checked for the model before downloading it.
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

#[derive(Args)]
struct DetectArgs {
    /// Image URL, absolute or relative to the origin.
    image: String,

    /// Origin of the detection service.
    #[arg(long, default_value = DEFAULT_ORIGIN)]
    origin: String,
}

#[derive(Args)]
struct AnnotateArgs {
    /// Image URL, absolute or relative to the origin.
    image: String,

    /// Output image file (format from extension).
    #[arg(short, long)]
    output: PathBuf,

    /// Origin of the detection service.
    #[arg(long, default_value = DEFAULT_ORIGIN)]
    origin: String,

    /// Trace eyes as standalone circles, without the pen move.
    #[arg(long)]
    no_eye_connector: bool,
}

/// The annotated raster starts at the image's own top-left.
struct ImageOrigin;

impl ImageLayout for ImageOrigin {
    fn image_offset(&self) -> Offset {
        Offset::default()
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Serve(args) => run_serve(args),
        Command::Detect(args) => run_detect(args),
        Command::Annotate(args) => run_annotate(args),
    }
}

fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate_confidence(args.confidence)?;
    if let Some(dir) = &args.static_dir {
        if !dir.is_dir() {
            return Err(format!("Static directory not found: {}", dir.display()).into());
        }
    }

    let detector = build_detector(args.confidence, args.model_dir.as_deref())?;
    let fetcher: Box<dyn ImageSource> = Box::new(HttpImageFetcher::new()?);
    let use_case = Arc::new(DetectFacesUseCase::new(fetcher, detector));

    let router = server::create_router(AppState::new(use_case.clone()), args.static_dir.as_deref());
    let addr = SocketAddr::new(args.host, args.port);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(addr, router))?;
    drop(runtime);

    // Blocking HTTP clients must be dropped outside the async runtime.
    drop(use_case);
    Ok(())
}

fn run_detect(args: DetectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = DetectionEndpoint::new(args.origin);
    let target = endpoint.request_target(&ImageDescriptor::new(args.image, 0, 0));

    let response = HttpDetectionClient::new()?.fetch(&target)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    match DetectionOutcome::from(response) {
        DetectionOutcome::Faces(faces) => {
            log::info!("{} face(s) detected", faces.len());
            Ok(())
        }
        DetectionOutcome::Error(message) => Err(message.into()),
    }
}

fn run_annotate(args: AnnotateArgs) -> Result<(), Box<dyn std::error::Error>> {
    image::ImageFormat::from_path(&args.output)
        .map_err(|_| format!("Unsupported output format: {}", args.output.display()))?;

    let endpoint = DetectionEndpoint::new(args.origin);
    let image_url = endpoint.absolute_image_url(&ImageDescriptor::new(args.image.clone(), 0, 0));
    let bytes = HttpImageFetcher::new()?.fetch(&image_url)?;
    let picture = image::load_from_memory(&bytes)?.into_rgba8();
    let (width, height) = picture.dimensions();

    let eyes = if args.no_eye_connector {
        EyeConnector::Suppress
    } else {
        EyeConnector::Preserve
    };
    let controller = OverlayController::new(endpoint, eyes);
    let mut state = ViewState::new();
    select_image(
        &mut state,
        &ImageDescriptor::new(args.image, width, height),
        &mut Activation::new(),
    );
    controller.detect_and_draw(
        &mut state,
        &ImageOrigin,
        &HttpDetectionClient::new()?,
        &mut Activation::new(),
    );

    if let Some(message) = state.error_message {
        return Err(message.into());
    }

    let mut surface = RasterSurface::from_image(picture);
    if let Some(overlay) = &state.surface {
        for (path, style) in overlay.strokes() {
            surface.stroke(path, style);
        }
    }
    surface.into_image().save(&args.output)?;
    log::info!("Output written to {}", args.output.display());
    Ok(())
}

fn build_detector(
    confidence: f64,
    model_dir: Option<&Path>,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {YOLO_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        YOLO_MODEL_NAME,
        YOLO_MODEL_URL,
        model_dir,
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    Ok(Box::new(OnnxYoloDetector::new(&model_path, confidence)?))
}

fn validate_confidence(confidence: f64) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(format!("Confidence must be between 0.0 and 1.0, got {confidence}").into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["facespot", "serve"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, 8080);
        assert_eq!(args.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(args.confidence, DEFAULT_CONFIDENCE);
        assert!(args.static_dir.is_none());
    }

    #[test]
    fn test_annotate_args() {
        let cli = Cli::parse_from([
            "facespot",
            "annotate",
            "/img/1.jpg",
            "-o",
            "out.png",
            "--no-eye-connector",
        ]);
        let Command::Annotate(args) = cli.command else {
            panic!("expected annotate");
        };
        assert_eq!(args.image, "/img/1.jpg");
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!(args.origin, "http://localhost:8080");
        assert!(args.no_eye_connector);
    }

    #[test]
    fn test_validate_confidence() {
        assert!(validate_confidence(0.5).is_ok());
        assert!(validate_confidence(1.5).is_err());
        assert!(validate_confidence(-0.1).is_err());
    }
}
