use crate::config::PlistConfig;
use crate::{DocsetError, Result};
use html_escape::encode_text;
use std::fmt::Write;
use std::path::Path;

/// Renders Info.plist for a docset whose entry page is `index_file_path`
pub fn render_info_plist(config: &PlistConfig, index_file_path: &str) -> String {
    let mut out = String::new();
    out.push_str(concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
        "<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" ",
        "\"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n",
        "<plist version=\"1.0\">\n",
        "<dict>\n",
    ));

    push_string(&mut out, "CFBundleIdentifier", &config.cfbundle_identifier);
    push_string(&mut out, "CFBundleName", &config.cfbundle_name);
    push_string(&mut out, "DocSetPlatformFamily", &config.docset_platform_family);
    push_string(&mut out, "dashIndexFilePath", index_file_path);
    push_true(&mut out, "isDashDocset");
    if config.javascript_enabled {
        push_true(&mut out, "isJavaScriptEnabled");
    }
    if let Some(play_url) = config.play_url.as_deref().filter(|u| !u.is_empty()) {
        push_string(&mut out, "DashDocSetPlayURL", play_url);
    }
    if config.fts_enabled {
        push_true(&mut out, "DashDocSetDefaultFTSEnabled");
    }

    out.push_str("</dict>\n</plist>\n");
    out
}

/// Renders and writes Info.plist to `path`
pub fn write_info_plist(path: &Path, config: &PlistConfig, index_file_path: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DocsetError::io(parent, e))?;
    }
    let content = render_info_plist(config, index_file_path);
    std::fs::write(path, content).map_err(|e| DocsetError::io(path, e))
}

fn push_string(out: &mut String, key: &str, value: &str) {
    let _ = writeln!(out, "\t<key>{}</key>", key);
    let _ = writeln!(out, "\t<string>{}</string>", encode_text(value));
}

fn push_true(out: &mut String, key: &str) {
    let _ = writeln!(out, "\t<key>{}</key>", key);
    out.push_str("\t<true/>\n");
}
