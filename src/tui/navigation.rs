use crate::io::state::UiState;
use crate::io::store::{SceneStore, StoreError};

/// Selected path through Project → Video → Script → Component.
/// Selecting a level clears everything below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    project: Option<String>,
    video: Option<String>,
    script: Option<String>,
    component: Option<String>,
}

impl Navigation {
    pub fn from_state(state: &UiState) -> Self {
        Navigation {
            project: state.project.clone(),
            video: state.video.clone(),
            script: state.script.clone(),
            component: state.component.clone(),
        }
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn video(&self) -> Option<&str> {
        self.video.as_deref()
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    pub fn select_project(&mut self, id: &str) {
        self.project = Some(id.to_string());
        self.video = None;
        self.script = None;
        self.component = None;
    }

    pub fn select_video(&mut self, id: &str) {
        self.video = Some(id.to_string());
        self.script = None;
        self.component = None;
    }

    pub fn select_script(&mut self, id: &str) {
        self.script = Some(id.to_string());
        self.component = None;
    }

    pub fn select_component(&mut self, id: &str) {
        self.component = Some(id.to_string());
    }

    pub fn select(&mut self, item: &SidebarItem) {
        match item.kind {
            NodeKind::Project => self.select_project(&item.id),
            NodeKind::Video => self.select_video(&item.id),
            NodeKind::Script => self.select_script(&item.id),
            NodeKind::Component => self.select_component(&item.id),
        }
    }

    pub fn is_selected(&self, item: &SidebarItem) -> bool {
        let current = match item.kind {
            NodeKind::Project => &self.project,
            NodeKind::Video => &self.video,
            NodeKind::Script => &self.script,
            NodeKind::Component => &self.component,
        };
        current.as_deref() == Some(item.id.as_str())
    }

    pub fn write_state(&self, state: &mut UiState) {
        state.project = self.project.clone();
        state.video = self.video.clone();
        state.script = self.script.clone();
        state.component = self.component.clone();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Project,
    Video,
    Script,
    Component,
}

/// One visible line of the navigation sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarItem {
    pub kind: NodeKind,
    pub id: String,
    pub label: String,
    pub depth: usize,
    /// Children are listed below this item
    pub expanded: bool,
}

/// Flatten the hierarchy into sidebar lines. Only the selected branch is expanded.
///
/// Selections that no longer exist in the store are dropped from `nav`.
pub fn build_sidebar(
    store: &dyn SceneStore,
    nav: &mut Navigation,
) -> Result<Vec<SidebarItem>, StoreError> {
    let mut items = Vec::new();
    let mut found = (false, false, false, false);

    for project in store.projects()? {
        let open = nav.project() == Some(project.id.as_str());
        found.0 |= open;
        items.push(SidebarItem {
            kind: NodeKind::Project,
            id: project.id.clone(),
            label: format!("{} ({})", project.title, project.eav_code),
            depth: 0,
            expanded: open,
        });
        if !open {
            continue;
        }
        for video in store.videos(&project.eav_code)? {
            let open = nav.video() == Some(video.id.as_str());
            found.1 |= open;
            items.push(SidebarItem {
                kind: NodeKind::Video,
                id: video.id.clone(),
                label: video.title.clone(),
                depth: 1,
                expanded: open,
            });
            if !open {
                continue;
            }
            for script in store.scripts(&video.id)? {
                let open = nav.script() == Some(script.id.as_str());
                found.2 |= open;
                items.push(SidebarItem {
                    kind: NodeKind::Script,
                    id: script.id.clone(),
                    label: format!("Script [{}]", script.status.label()),
                    depth: 2,
                    expanded: open,
                });
                if !open {
                    continue;
                }
                for component in store.components(&script.id)? {
                    found.3 |= nav.component() == Some(component.id.as_str());
                    items.push(SidebarItem {
                        kind: NodeKind::Component,
                        label: component.label(),
                        id: component.id,
                        depth: 3,
                        expanded: false,
                    });
                }
            }
        }
    }

    if !found.0 {
        *nav = Navigation::default();
    } else if !found.1 {
        nav.video = None;
        nav.script = None;
        nav.component = None;
    } else if !found.2 {
        nav.script = None;
        nav.component = None;
    } else if !found.3 {
        nav.component = None;
    }
    Ok(items)
}
