//! Entry point for the EZM inspector.
//! Loads EZM scenes and coordinate files, builds skeletons, composes the
//! bind pose and logs what was found.

use anyhow::Result;
use asset::ezm::{EzmModel, load_ezm_from_path};
use asset::points::{PointImportOptions, TwoTokenMode, load_points_from_path};
use corelib::uniform::RecordingSink;
use corelib::{Pose, Skeleton};
use renderer::uniforms::{MATRIX_SIZE, matrix_columns};
use renderer::{MAX_BONES, skeleton_lines};

const PALETTE_UNIFORM: &str = "bones";

#[derive(Debug, Default)]
struct Args {
    ezm: Option<String>,
    skeleton: Option<String>,
    palette: bool,
    points: Option<String>,
    two_token: TwoTokenMode,
}

fn parse_args() -> Args {
    // Accept: --ezm=PATH --skeleton=NAME --palette --points=PATH --two-token=carry-x|legacy
    let mut args = Args::default();
    for arg in std::env::args().skip(1) {
        if let Some(val) = arg.strip_prefix("--ezm=") {
            args.ezm = Some(val.to_owned());
        } else if let Some(val) = arg.strip_prefix("--skeleton=") {
            args.skeleton = Some(val.to_owned());
        } else if arg == "--palette" {
            args.palette = true;
        } else if let Some(val) = arg.strip_prefix("--points=") {
            args.points = Some(val.to_owned());
        } else if let Some(val) = arg.strip_prefix("--two-token=") {
            args.two_token = match val.to_ascii_lowercase().as_str() {
                "carry-x" | "carryx" => TwoTokenMode::CarryX,
                "legacy" => TwoTokenMode::Legacy,
                other => {
                    log::warn!("Unknown two-token mode '{}', using carry-x.", other);
                    TwoTokenMode::CarryX
                }
            };
        } else {
            log::warn!("Ignoring unrecognised argument '{}'", arg);
        }
    }
    args
}

fn log_tree(skeleton: &Skeleton, pose: &Pose) {
    for id in skeleton.depth_first() {
        let node = skeleton.node(id);
        let origin = pose.world(id).w_axis.truncate();
        log::info!(
            "{:indent$}{} @ ({:.3}, {:.3}, {:.3})",
            "",
            node.name(),
            origin.x,
            origin.y,
            origin.z,
            indent = 2 * skeleton.depth(id)
        );
    }
}

fn inspect_model(model: &EzmModel, args: &Args) {
    let doc = model.document();
    log::info!(
        "Asset '{}' ({}): {} materials, {} meshes",
        doc.asset_name(),
        doc.asset_info(),
        doc.materials().len(),
        doc.meshes().len()
    );
    for material in doc.materials() {
        log::info!("Material '{}' [{}]", material.name(), material.meta_data());
    }
    for mesh in doc.meshes() {
        log::info!(
            "Mesh '{}' -> skeleton '{}': {} vertices, {} submeshes",
            mesh.name(),
            mesh.skeleton(),
            mesh.data().vertices.len(),
            mesh.submeshes().len()
        );
    }

    let mut sink = RecordingSink::default();
    for (decl, skeleton) in model.skeletons() {
        if args.skeleton.as_deref().is_some_and(|want| want != decl.name()) {
            continue;
        }
        log::info!("Skeleton '{}' ({} bones)", decl.name(), skeleton.len());
        let pose = Pose::compute(skeleton);
        log_tree(skeleton, &pose);

        log::debug!("{} bone line vertices", skeleton_lines(skeleton, &pose).len());

        if args.palette {
            pose.upload(skeleton, &mut sink, PALETTE_UNIFORM);
            if let Some(palette) = sink.last_array(PALETTE_UNIFORM) {
                // Same columns a default-sized palette buffer would receive.
                let columns = matrix_columns(palette, MAX_BONES as u64 * MATRIX_SIZE);
                for ((_, node), cols) in skeleton.nodes().zip(&columns) {
                    log::info!("  {}: {:?}", node.name(), cols);
                }
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();
    log::info!("Starting EZM inspector: {:?}", args);

    if args.ezm.is_none() && args.points.is_none() {
        log::warn!("Nothing to do. Pass --ezm=PATH and/or --points=PATH.");
        return Ok(());
    }

    if let Some(path) = &args.ezm {
        let model = load_ezm_from_path(path)?;
        inspect_model(&model, &args);
    }

    if let Some(path) = &args.points {
        let options = PointImportOptions {
            two_token: args.two_token,
        };
        let points = load_points_from_path(path, options)?;
        for (i, p) in points.iter().enumerate() {
            log::debug!("point {}: ({}, {}, {})", i, p.x, p.y, p.z);
        }
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            log::info!("Points: first {:?}, last {:?}", first, last);
        }
    }

    log::info!("Done.");
    Ok(())
}
