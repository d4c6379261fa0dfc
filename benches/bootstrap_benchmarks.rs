use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sha2::{Digest, Sha256};

use org_client_bootstrap::app::{ClientRegistry, RegistrySettings};
use org_client_bootstrap::domain::NetworkConfig;

fn sixty_four_peer_config() -> NetworkConfig {
    let peers: Vec<String> = (0..64)
        .map(|i| {
            let org = if i % 2 == 0 { "org.one" } else { "org.two" };
            format!(
                r#"{{
                    "channelName": "default",
                    "orderer": {{ "url": "grpcs://orderer:7050" }},
                    "peer": {{ "url": "grpcs://peer{i}:7051", "eventUrl": "grpcs://peer{i}:7053", "org": "{org}" }},
                    "ca": {{ "url": "https://ca{i}:7054", "name": "ca{i}" }},
                    "admin": {{ "enrollmentId": "admin{i}", "enrollmentSecret": "adminpw" }}
                }}"#
            )
        })
        .collect();
    NetworkConfig::from_json_str(&format!(r#"{{ "peers": [{}] }}"#, peers.join(","))).unwrap()
}

fn bench_registry_build(c: &mut Criterion) {
    let config = sixty_four_peer_config();
    let settings = RegistrySettings {
        org_id: "org.one".to_string(),
        dedicated_event_client: true,
    };

    c.bench_function("registry_build_64_peers", |b| {
        b.iter(|| {
            let _ = ClientRegistry::build(black_box(&config), &settings);
        })
    });
}

fn bench_registration_digest(c: &mut Criterion) {
    let payload = r#"{"channel":"default","events":["block"],"requestId":"00000000-0000-0000-0000-000000000000"}"#
        .repeat(4);

    c.bench_function("sha256_registration_digest", |b| {
        b.iter(|| {
            let mut hasher = Sha256::new();
            hasher.update(black_box(&payload).as_bytes());
            let _ = hasher.finalize();
        })
    });
}

criterion_group!(benches, bench_registry_build, bench_registration_digest);
criterion_main!(benches);
