use std::time::{Duration, Instant};

use actix_web::HttpResponse;

const LOAD_DURATION: Duration = Duration::from_secs(100);
const RAM_CHUNK_BYTES: usize = 64 * 1024 * 1024;
const RAM_MAX_BYTES: usize = 1024 * 1024 * 1024;

/// GET /api/load/cpu
///
/// Spawns a detached worker that burns one core for a fixed duration and
/// acknowledges immediately. Only routed when load endpoints are enabled.
pub async fn cpu_load() -> HttpResponse {
    tokio::task::spawn_blocking(|| burn_cpu(LOAD_DURATION));
    HttpResponse::Ok().json(serde_json::json!({
        "message": "CPU load started (100s)"
    }))
}

/// GET /api/load/ram
pub async fn ram_load() -> HttpResponse {
    tokio::task::spawn_blocking(|| hold_ram(LOAD_DURATION));
    HttpResponse::Ok().json(serde_json::json!({
        "message": "RAM load started (100s)"
    }))
}

fn burn_cpu(duration: Duration) {
    let deadline = Instant::now() + duration;
    let mut x: u64 = 0x9e3779b97f4a7c15;
    while Instant::now() < deadline {
        for _ in 0..10_000 {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        }
        std::hint::black_box(x);
    }
    log::info!("CPU load worker finished");
}

fn hold_ram(duration: Duration) {
    let deadline = Instant::now() + duration;
    let mut chunks: Vec<Vec<u8>> = Vec::new();

    while chunks.len() * RAM_CHUNK_BYTES < RAM_MAX_BYTES && Instant::now() < deadline {
        // Write every page so the allocation is actually committed.
        let mut chunk = vec![0u8; RAM_CHUNK_BYTES];
        for byte in chunk.iter_mut().step_by(4096) {
            *byte = 1;
        }
        chunks.push(chunk);
    }

    std::hint::black_box(&chunks);
    let remaining = deadline.saturating_duration_since(Instant::now());
    std::thread::sleep(remaining);
    drop(chunks);
    log::info!("RAM load worker finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_burn_respects_deadline() {
        let start = Instant::now();
        burn_cpu(Duration::from_millis(50));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
