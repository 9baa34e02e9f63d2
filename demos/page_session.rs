//! Simulates two page visits against a cookie file.
//!
//! ```text
//! RUST_LOG=debug cargo run --example page_session -- /tmp/consent.json accept
//! ```
//!
//! The first argument is the cookie file, the second one of `accept`, `reject`,
//! `analytics` (custom save with analytics only) or `none`.

use cookie_consent::cookies::{CookieJar, JsonCookieStore};
use cookie_consent::{
    ConsentPhase, ConsentStore, Integrations, PreferenceRecord, PromptSurface, SettingsSurface, ToggleStates,
    UiAction,
};

struct ConsoleBanner;

impl PromptSurface for ConsoleBanner {
    fn show(&mut self) {
        println!("[banner] We use cookies. Accept all / Reject all / Settings");
    }

    fn hide(&mut self) {
        println!("[banner] hidden");
    }
}

struct ConsoleSettings {
    toggles: ToggleStates,
}

impl SettingsSurface for ConsoleSettings {
    fn show(&mut self) {
        println!("[settings] open: {:?}", self.toggles);
    }

    fn hide(&mut self) {
        println!("[settings] closed");
    }

    fn read_toggles(&self) -> ToggleStates {
        self.toggles
    }

    fn sync_toggles(&mut self, record: &PreferenceRecord) {
        self.toggles = ToggleStates {
            analytics: Some(record.analytics),
            marketing: Some(record.marketing),
            preferences: Some(record.preferences),
        };
    }
}

fn session(path: &std::path::Path) -> anyhow::Result<ConsentStore> {
    let store = ConsentStore::builder()
        .jar(JsonCookieStore::new(path.to_path_buf())?)
        .hooks(
            Integrations::new()
                .on_analytics(|| println!("[tracking] analytics loaded"))
                .on_marketing(|| println!("[tracking] marketing loaded"))
                .on_preferences(|| println!("[tracking] preference cookies enabled")),
        )
        .prompt(ConsoleBanner)
        .settings(ConsoleSettings { toggles: ToggleStates::default() })
        .build();
    Ok(store)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("cookie-consent-demo.json"));
    let choice = args.next().unwrap_or_else(|| "accept".to_string());

    println!("--- first visit ---");
    let mut first = session(&path)?;
    if first.start().await == ConsentPhase::AwaitingDecision {
        match choice.as_str() {
            "accept" => first.handle(UiAction::AcceptAll),
            "reject" => first.handle(UiAction::RejectAll),
            "analytics" => {
                first.handle(UiAction::OpenSettings);
                first.save_custom(cookie_consent::CustomChoices {
                    analytics: true,
                    marketing: false,
                    preferences: false,
                });
            }
            _ => println!("(no decision made)"),
        }
    }
    println!("record: {:?}", first.record());
    println!("cookie: {}", first.jar().cookie_string());

    println!("--- second visit ---");
    let mut second = session(&path)?;
    let phase = second.start().await;
    println!("phase: {:?}, record: {:?}", phase, second.record());

    Ok(())
}
