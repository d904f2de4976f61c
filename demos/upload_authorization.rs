use snapstore_auth::authorizer::header_for_bundle;
use snapstore_auth::discharge::{DischargeEndpoint, acquire_discharge};
use snapstore_auth::storage::{MemoryStore, UploadRequestBundle, read_bundle, write_bundle};
use snapstore_auth::{Macaroon, StoreConfig};

/// Stands in for the application server, which performed the SSO login
/// and holds the discharge in its session.
struct SessionEndpoint {
    discharge: String,
}

impl DischargeEndpoint for SessionEndpoint {
    async fn fetch(&self) -> snapstore_auth::Result<String> {
        Ok(self.discharge.clone())
    }

    async fn delete(&self) -> snapstore_auth::Result<()> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    println!("=== Store Upload Authorization Flow ===\n");

    let config = StoreConfig::new(
        "https://build.example.com",
        "https://login.example.com/+login",
        "https://store.example.com/api/v2",
    )?;
    let sso_host = config.sso_host()?.to_string();

    // Step 1: the store issues a root macaroon scoped to the package,
    // with a third-party caveat only the SSO service can discharge
    println!("1. Store issues root macaroon with an SSO third-party caveat");
    let mut root = Macaroon::new(
        b"store root secret",
        "package-upload-hello-world",
        Some("https://store.example.com"),
    );
    root.add_first_party_caveat("package = hello-world");
    root.add_third_party_caveat("sso caveat", "sso verification key", sso_host.as_str());

    let store = MemoryStore::new();
    write_bundle(&store, &UploadRequestBundle::new(root.to_base64()?))?;
    println!("   Root saved to the credential store (no discharge yet)");

    // Step 2: the SSO service issues the discharge after the user signs
    // in; the server session holds it until the client collects it
    println!("\n2. SSO service issues the discharge macaroon");
    let discharge = Macaroon::create_discharge(
        b"sso verification key",
        "sso caveat",
        Some(sso_host.as_str()),
    );
    let endpoint = SessionEndpoint {
        discharge: discharge.to_base64()?,
    };

    // Step 3: acquire the discharge, verify it names the root's SSO
    // caveat, and persist the completed bundle
    println!("\n3. Client acquires the discharge and completes the bundle");
    acquire_discharge(&endpoint, &store, &sso_host).await?;
    let bundle = read_bundle(&store)?.expect("bundle was just written");
    println!("   Bundle now holds root + discharge");

    // Step 4: every store request binds the discharge to the root afresh
    println!("\n4. Client builds the per-request authorization header");
    let header = header_for_bundle(&bundle)?;
    println!("   Authorization: {header}");

    println!("\n=== Flow Complete ===");
    Ok(())
}
