use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, post, put, web};
use log::{error, info};
use serde::Deserialize;

use hashkov_core::config::HashkovConfig;
use hashkov_core::model::corpus::{corpus_path, list_corpora};
use hashkov_core::model::snapshot::snapshot_path;
use hashkov_core::{GenerationInput, Generator, HashkovError, MarkovChain, StartSeed};

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	length: Option<usize>,
	budget: Option<usize>,
	seed: Option<String> // -> none, custom:<token> or hashtag:<anchor>
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>
}

#[derive(Deserialize)]
struct SnapshotQuery {
	name: Option<String>
}

struct SharedData {
	generator: Generator,
	defaults: GenerationInput,
	data_dir: PathBuf,
}

impl GenerateParams {
	/// Builds the generation input, falling back to the configured defaults.
	fn generation_input(&self, defaults: &GenerationInput) -> Result<GenerationInput, String> {
		let start_seed = match &self.seed {
			None => StartSeed::Sentinel,
			Some(s) => StartSeed::parse(s)?,
		};
		Ok(GenerationInput {
			length: self.length.unwrap_or(defaults.length),
			budget: self.budget.unwrap_or(defaults.budget),
			start_seed,
		})
	}
}

/// Name accepted for corpora and snapshots: no path separators.
fn is_valid_name(name: &str) -> bool {
	!name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates a message from the shared chain based on query parameters.
/// Returns the message as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let input = match query.generation_input(&shared_data.defaults) {
		Ok(input) => input,
		Err(e) => return HttpResponse::BadRequest().body(e)
	};

	match shared_data.generator.generate(&input, &mut rand::rng()) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e @ HashkovError::NoEligibleSeed(_)) => HttpResponse::NotFound().body(e.to_string()),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP POST endpoint `/v1/train`
///
/// The body is raw text, one unit per line.
#[post("/v1/train")]
async fn post_train(data: web::Data<Mutex<SharedData>>, body: String) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	let trained = shared_data.generator.train(body.lines().filter(|line| !line.trim().is_empty()));
	info!("trained {} samples", trained);
	HttpResponse::Ok().body(trained.to_string())
}

#[get("/v1/starts")]
async fn get_starts(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	let mut starts: Vec<&str> = shared_data.generator.chain().get_possible_starts().into_iter().collect();
	starts.sort_unstable();
	HttpResponse::Ok().body(starts.join("\n"))
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let data_dir = match data.lock() {
		Ok(m) => m.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	match list_corpora(&data_dir) {
		Ok(files) => HttpResponse::Ok().body(files.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora")
	}
}

#[put("/v1/load_corpora")]
async fn put_corpora(data: web::Data<Mutex<SharedData>>, query: web::Query<CorpusQuery>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let corpus_names: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();
	if let Some(name) = corpus_names.iter().find(|name| !is_valid_name(name)) {
		return HttpResponse::BadRequest().body(format!("Invalid corpus name: {name}"));
	}

	let mut chain = MarkovChain::new();
	for name in corpus_names {
		let path = corpus_path(&shared_data.data_dir, name);
		match MarkovChain::from_corpus(&path, shared_data.generator.pipeline()) {
			Ok(partial_chain) => chain.merge(&partial_chain),
			Err(e) => {
				error!("failed to load {}: {e}", path.display());
				return HttpResponse::InternalServerError().body(format!("Failed to load corpus: {e}"))
			}
		}
	}
	shared_data.generator.chain_mut().merge(&chain);

	HttpResponse::Ok().body("Corpora loaded successfully")
}

/// HTTP PUT endpoint `/v1/save`
///
/// Writes the shared chain as the snapshot `<name>.chain` in the data directory.
#[put("/v1/save")]
async fn put_save(data: web::Data<Mutex<SharedData>>, query: web::Query<SnapshotQuery>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let name = match &query.name {
		Some(s) if is_valid_name(s.trim()) => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or invalid snapshot name"),
	};

	let path = snapshot_path(&shared_data.data_dir, name);
	match shared_data.generator.chain().save(&path) {
		Ok(()) => HttpResponse::Ok().body(format!("Chain saved to {}", path.display())),
		Err(e) => HttpResponse::InternalServerError().body(format!("Failed to save chain: {e}")),
	}
}

/// HTTP PUT endpoint `/v1/load`
///
/// Replaces the shared chain with the snapshot `<name>.chain`.
#[put("/v1/load")]
async fn put_load(data: web::Data<Mutex<SharedData>>, query: web::Query<SnapshotQuery>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let name = match &query.name {
		Some(s) if is_valid_name(s.trim()) => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or invalid snapshot name"),
	};

	let path = snapshot_path(&shared_data.data_dir, name);
	match MarkovChain::load(&path) {
		Ok(chain) => {
			let states = chain.len();
			shared_data.generator.set_chain(chain);
			HttpResponse::Ok().body(format!("Chain loaded with {states} states"))
		}
		Err(HashkovError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
			HttpResponse::NotFound().body(format!("No snapshot named {name}"))
		}
		Err(e) => {
			error!("failed to load {}: {e}", path.display());
			HttpResponse::InternalServerError().body(format!("Failed to load chain: {e}"))
		}
	}
}

/// Main entry point for the server.
///
/// Builds the generator from the configuration (`HASHKOV_CONFIG`, defaults
/// otherwise), wraps it in a `Mutex`, and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - Log level is driven by `RUST_LOG` (default `info`).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = HashkovConfig::from_env().map_err(std::io::Error::other)?;
	let pipeline = config.build_pipeline().map_err(std::io::Error::other)?;

	let shared_data = SharedData {
		generator: Generator::new(pipeline),
		defaults: config.generation_input(),
		data_dir: config.data_path(),
	};
	info!("serving chain data from {}", shared_data.data_dir.display());
	let shared_chain = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_chain.clone())
			.service(get_generated)
			.service(post_train)
			.service(get_starts)
			.service(get_corpora)
			.service(put_corpora)
			.service(put_save)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
