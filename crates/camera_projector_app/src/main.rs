// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera projector demo.
//!
//! Builds a scene with one camera, runs the projector command, prints where
//! a few world points land in the camera image and dumps the graph as RON.

use camera_projector_app::{
    CommandOutcome, CreateCameraProjector, EditorState, ProjectorConfig, SceneData, SceneObject, Transform,
};
use camera_projector_graph::graphs::camera_project::description::sockets;
use camera_projector_graph::{evaluate, graph_name, EvaluationEnvironment, GraphRepository};
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| camera_projector_app::config::CONFIG_FILE_NAME.to_string());
    let config = match ProjectorConfig::load(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            std::process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting camera projector v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(config: ProjectorConfig) -> Result<(), String> {
    let mut scene = SceneData::new();
    let camera = scene.add_object(
        SceneObject::camera("Camera").with_transform(Transform::at([0.0, -10.0, 0.0]).with_rotation([90.0, 0.0, 0.0])),
    );

    let mut state = EditorState::with_scene(scene, config);
    state.set_active(camera);

    if state.run(&CreateCameraProjector) != CommandOutcome::Finished {
        let reason = state.last_status().map(|s| s.text.clone()).unwrap_or_default();
        return Err(format!("Projector command failed: {reason}"));
    }

    let name = graph_name("Camera");
    let graph = state.graphs.get(&name).ok_or_else(|| format!("Missing graph '{name}'"))?;

    for point in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [-2.0, 5.0, 1.5]] {
        let env = EvaluationEnvironment::new(&state.scene, point);
        let uv = evaluate(graph, &env).map_err(|e| e.to_string())?;
        let [u, v, _] = uv.output(sockets::VECTOR).map(|value| value.as_vector()).unwrap_or_default();
        println!("{point:?} -> ({u:.4}, {v:.4})");
    }

    println!("{}", graph.to_ron().map_err(|e| e.to_string())?);
    Ok(())
}
