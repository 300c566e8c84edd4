//! The browser editor served at `/`.

use linkpage_render::escape::escape;
use linkpage_render::FontTable;

const FONT_OPTIONS_SLOT: &str = "<!--font-options-->";

/// Render the editor page, offering every key of `fonts`.
pub fn editor_page(fonts: &FontTable) -> String {
    let options: String = fonts
        .keys()
        .map(|key| {
            let key = escape(key);
            format!("<option value=\"{key}\">{key}</option>")
        })
        .collect();

    EDITOR_PAGE.replace(FONT_OPTIONS_SLOT, &options)
}

const EDITOR_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>linkpage editor</title>
  <style>
    * { box-sizing: border-box; }
    body { font-family: system-ui, sans-serif; margin: 0; display: grid; grid-template-columns: 420px 1fr; min-height: 100vh; }
    aside { padding: 1.5rem; border-right: 1px solid #e5e7eb; overflow-y: auto; height: 100vh; }
    main { padding: 1.5rem; background: #f3f4f6; display: flex; flex-direction: column; gap: 1rem; }
    fieldset { border: 1px solid #e5e7eb; border-radius: 0.5rem; margin: 0 0 1rem; padding: 1rem; }
    label { display: block; font-size: 0.85rem; margin-bottom: 0.75rem; }
    input, textarea, select { width: 100%; padding: 0.4rem 0.5rem; margin-top: 0.25rem; font: inherit; }
    button { padding: 0.45rem 0.9rem; border-radius: 0.375rem; border: 1px solid #111827; background: #111827; color: #fff; cursor: pointer; }
    button:disabled { opacity: 0.4; cursor: not-allowed; }
    #links { list-style: none; padding: 0; }
    #links li { display: flex; justify-content: space-between; align-items: center; padding: 0.4rem 0; border-bottom: 1px solid #f3f4f6; }
    iframe { flex: 1; width: 100%; border: 1px solid #e5e7eb; border-radius: 0.5rem; background: #fff; }
    #export-text { flex: 1; width: 100%; font-family: ui-monospace, monospace; font-size: 0.8rem; }
    [hidden] { display: none !important; }
  </style>
</head>
<body>
  <aside>
    <fieldset>
      <legend>Profile</legend>
      <label>Display name<input name="displayName" data-target="profile"></label>
      <label>Username<input name="username" data-target="profile"></label>
      <label>Bio<textarea name="bio" rows="3" data-target="profile"></textarea></label>
      <label>Avatar URL<input name="avatar" type="url" data-target="profile"></label>
    </fieldset>
    <fieldset>
      <legend>Theme</legend>
      <label>Background<input name="theme.backgroundColor" data-target="profile"></label>
      <label>Text<input name="theme.textColor" data-target="profile"></label>
      <label>Button<input name="theme.buttonColor" data-target="profile"></label>
      <label>Button text<input name="theme.buttonTextColor" data-target="profile"></label>
      <label>Heading font<select name="theme.headingFont" data-target="profile"><!--font-options--></select></label>
      <label>Text font<select name="theme.textFont" data-target="profile"><!--font-options--></select></label>
      <label>Button rounding<input name="theme.buttonRounding" type="range" min="0" max="30" data-target="profile"></label>
    </fieldset>
    <fieldset>
      <legend>Links</legend>
      <ul id="links"></ul>
      <label>Title<input name="title" data-target="draft"></label>
      <label>URL<input name="url" type="url" data-target="draft"></label>
      <label>Icon URL<input name="iconUrl" type="url" data-target="draft"></label>
      <button id="add-link" disabled>Add link</button>
    </fieldset>
  </aside>
  <main>
    <div><button id="toggle-view">Export</button></div>
    <section id="editor-panel">
      <iframe id="preview" title="Preview" sandbox="allow-popups"></iframe>
    </section>
    <section id="export-panel" hidden>
      <textarea id="export-text" rows="30" readonly></textarea>
      <p>
        <button id="copy">Copy HTML</button>
        <a href="/export" download>Download</a>
      </p>
    </section>
  </main>
  <script src="/__live.js"></script>
  <script>
  (function() {
    'use strict';

    const preview = document.getElementById('preview');
    const exportText = document.getElementById('export-text');
    const addButton = document.getElementById('add-link');
    const list = document.getElementById('links');

    function fieldValue(snapshot, el) {
      const source = el.dataset.target === 'draft' ? snapshot.draft : snapshot.profile;
      if (el.name.startsWith('theme.')) {
        return source.theme[el.name.slice(6)];
      }
      return source[el.name];
    }

    function render(snapshot) {
      document.querySelectorAll('[data-target]').forEach(function(el) {
        if (document.activeElement !== el) {
          const value = fieldValue(snapshot, el);
          el.value = value === undefined || value === null ? '' : value;
        }
      });

      addButton.disabled = !(snapshot.draft.title && snapshot.draft.url);

      list.replaceChildren();
      snapshot.profile.links.forEach(function(link) {
        const item = document.createElement('li');
        const label = document.createElement('span');
        label.textContent = link.title;
        const remove = document.createElement('button');
        remove.textContent = 'Remove';
        remove.addEventListener('click', function() {
          send('/api/command', { type: 'remove_link', id: link.id });
        });
        item.append(label, remove);
        list.append(item);
      });

      const exporting = snapshot.view === 'export';
      document.getElementById('editor-panel').hidden = exporting;
      document.getElementById('export-panel').hidden = !exporting;
      document.getElementById('toggle-view').textContent = exporting ? 'Editor' : 'Export';
    }

    function setPreview(html) {
      preview.srcdoc = html;
      exportText.value = html;
    }

    async function send(path, body) {
      const response = await fetch(path, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body),
      });
      if (response.ok) {
        render(await response.json());
      }
    }

    async function refresh() {
      render(await (await fetch('/api/state')).json());
      setPreview(await (await fetch('/preview')).text());
    }

    document.querySelectorAll('[data-target]').forEach(function(el) {
      el.addEventListener('input', function() {
        send('/api/field', { target: el.dataset.target, name: el.name, value: el.value });
      });
    });

    addButton.addEventListener('click', function() {
      send('/api/command', { type: 'commit_draft' });
    });

    document.getElementById('toggle-view').addEventListener('click', function() {
      send('/api/command', { type: 'toggle_export_view' });
    });

    document.getElementById('copy').addEventListener('click', function() {
      navigator.clipboard.writeText(exportText.value);
    });

    window.addEventListener('linkpage:preview', function(e) { setPreview(e.detail); });
    window.addEventListener('linkpage:view', refresh);
    window.addEventListener('linkpage:state', refresh);

    refresh();
  })();
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_font_keys_in_both_selects() {
        let page = editor_page(&FontTable::builtin());

        assert_eq!(page.matches("<option value=\"jetbrains-mono\">").count(), 2);
        assert!(!page.contains(FONT_OPTIONS_SLOT));
    }

    #[test]
    fn names_inputs_after_profile_fields() {
        let page = editor_page(&FontTable::builtin());

        for name in ["displayName", "theme.buttonRounding", "iconUrl"] {
            assert!(page.contains(&format!("name=\"{}\"", name)), "missing {}", name);
        }
        assert!(page.contains("sandbox=\"allow-popups\""));
    }
}
