use ureq::tls::{TlsConfig, TlsProvider};
use ureq::Agent;

/// Blocking HTTP agent shared by all outbound Google API calls
pub fn get_ureq_agent() -> Agent {
    let config = Agent::config_builder()
        .tls_config(
            TlsConfig::builder()
                .provider(TlsProvider::NativeTls)
                .build(),
        )
        .build();
    config.into()
}
