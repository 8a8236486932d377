//! Per-tab stealth preparation, applied before navigation.
//!
//! The source site probes for automation (devtools detection via console
//! logging, forced reload loops, relative-time rendering). Each step here is
//! best effort: a failed injection is logged and the crawl continues, since
//! most pages stay extractable without full stealth.

use std::sync::Arc;

use chrono::Utc;
use headless_chrome::protocol::cdp::types::Event;
use headless_chrome::protocol::cdp::{Emulation, Page};
use headless_chrome::Tab;

use super::config::BrowserConfig;

/// Timezone forced onto every page so time-dependent rendering is
/// deterministic. Windows Chrome expects a Windows zone name.
fn fixed_timezone() -> &'static str {
    if cfg!(windows) {
        "Eastern Standard Time"
    } else {
        "America/Toronto"
    }
}

/// Suppresses the devtools detection probe while leaving all other console
/// output intact, and turns in-page reloads into logged no-ops so scraped
/// state survives anti-automation reload loops.
const NEUTRALIZE_DETECTION_SCRIPT: &str = r#"
    const originalLog = console.log;
    console.log = function(...args) {
        if (args.length === 1 && args[0] === '[object HTMLDivElement]') {
            return; // skip detection trick
        }
        return originalLog.apply(console, args);
    };

    window.location.reload = () => console.log('Reload prevented');
"#;

/// Hides the usual automation fingerprints the site's scripts look for.
const FINGERPRINT_SCRIPT: &str = r#"
    Object.defineProperty(navigator, 'webdriver', {
        get: () => undefined
    });

    window.chrome = {
        runtime: {}
    };

    Object.defineProperty(navigator, 'plugins', {
        get: () => [1, 2, 3, 4, 5]
    });

    Object.defineProperty(navigator, 'languages', {
        get: () => ['en-US', 'en']
    });

    const getParameter = WebGLRenderingContext.prototype.getParameter;
    WebGLRenderingContext.prototype.getParameter = function(parameter) {
        if (parameter === 37445) {
            return 'Intel Inc.';
        }
        if (parameter === 37446) {
            return 'Intel(R) Iris(TM) Plus Graphics 640';
        }
        return getParameter.call(this, parameter);
    };

    delete window.cdc_adoQpoasnfa76pfcZLmcfl_Array;
    delete window.cdc_adoQpoasnfa76pfcZLmcfl_Promise;
    delete window.cdc_adoQpoasnfa76pfcZLmcfl_Symbol;
"#;

/// Freezes the page's notion of "now" to the capture instant: zero-argument
/// construction and `Date.now()` return the fixed instant while explicit
/// date construction behaves normally.
fn freeze_time_script(instant_iso: &str) -> String {
    format!(
        r#"
        const fixedDate = new Date('{instant_iso}');
        Date = class extends Date {{
            constructor(...args) {{
                if (args.length === 0) {{
                    return fixedDate;
                }}
                return super(...args);
            }}
            static now() {{
                return fixedDate.getTime();
            }}
        }};
        "#
    )
}

/// Pre-navigation script payloads, applied in order.
pub fn stealth_scripts() -> Vec<String> {
    let now_iso = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    vec![
        NEUTRALIZE_DETECTION_SCRIPT.to_string(),
        FINGERPRINT_SCRIPT.to_string(),
        freeze_time_script(&now_iso),
    ]
}

/// Forward in-page console output to the diagnostic log at debug level,
/// including nested argument values, without blocking page execution.
fn install_console_bridge(tab: &Arc<Tab>) -> Result<(), String> {
    tab.enable_log().map_err(|e| e.to_string())?;
    tab.add_event_listener(Arc::new(move |event: &Event| {
        if let Event::LogEntryAdded(e) = event {
            let entry = &e.params.entry;
            log::debug!("[Browser Console] {:?}: {}", entry.level, entry.text);
            if let Some(args) = &entry.args {
                for arg in args {
                    if let Some(value) = &arg.value {
                        log::debug!("   Arg: {}", value);
                    }
                }
            }
        }
    }))
    .map_err(|e| e.to_string())?;
    Ok(())
}

fn inject_on_new_document(tab: &Arc<Tab>, source: String) -> Result<(), String> {
    tab.call_method(Page::AddScriptToEvaluateOnNewDocument {
        source,
        world_name: None,
        include_command_line_api: None,
        run_immediately: None,
    })
    .map(|_| ())
    .map_err(|e| e.to_string())
}

/// Prepare a fresh tab for navigation. Never fails the crawl: each step
/// logs and continues on error.
pub fn prepare_tab(tab: &Arc<Tab>, config: &BrowserConfig) {
    if let Err(e) = install_console_bridge(tab) {
        log::warn!("Console bridge installation failed: {}", e);
    }

    for script in stealth_scripts() {
        if let Err(e) = inject_on_new_document(tab, script) {
            log::warn!("Stealth script injection failed: {}", e);
        }
    }

    let timezone = fixed_timezone();
    if let Err(e) = tab.call_method(Emulation::SetTimezoneOverride {
        timezone_id: timezone.to_string(),
    }) {
        log::warn!("Timezone override to {} failed: {}", timezone, e);
    }

    if let Err(e) = tab.set_user_agent(config.user_agent(), None, None) {
        log::warn!("User agent override failed: {}", e);
    }
}
