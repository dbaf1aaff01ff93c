//! Update function for the module library picker, Elm-style: it receives
//! the current state, the `Context`, and a `Msg`, mutates the state, and
//! returns whether the view should re-render.
//!
//! Each user event maps to exactly one action:
//! - course selection fetches the template structure,
//! - module selection fetches the target course's sections,
//! - form submission calls the copy endpoint,
//! - cancel resets the form locally.
//!
//! A successful copy shows a toast and schedules a page reload; every
//! endpoint failure surfaces through a toast.

use common::model::copy::CopyOutcome;
use common::model::section::SectionRef;
use common::model::structure::TemplateStructure;
use common::requests::CopyActivityRequest;
use gloo_net::http::Request;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::helpers::{fetch_json, reload_after, show_toast};
use super::messages::Msg;
use super::state::{LibraryComponent, SelectedModule};

const RELOAD_DELAY_MS: u32 = 1200;

pub fn update(
    component: &mut LibraryComponent,
    ctx: &Context<LibraryComponent>,
    msg: Msg,
) -> bool {
    match msg {
        Msg::CourseSelected(None) => {
            component.selected_course = None;
            component.structure = None;
            component.loading_structure = false;
            component.reset_copy_form();
            true
        }
        Msg::CourseSelected(Some(course_id)) => {
            component.selected_course = Some(course_id);
            component.structure = None;
            component.loading_structure = true;
            component.reset_copy_form();

            let link = ctx.link().clone();
            spawn_local(async move {
                let url = format!("/api/library/structure/{}", course_id);
                match fetch_json::<TemplateStructure>(&url).await {
                    Ok(structure) => link.send_message(Msg::StructureLoaded(structure)),
                    Err(e) => link.send_message(Msg::StructureFailed(e)),
                }
            });
            true
        }
        Msg::StructureLoaded(structure) => {
            component.loading_structure = false;
            component.structure = Some(structure);
            true
        }
        Msg::StructureFailed(message) => {
            component.loading_structure = false;
            gloo_console::warn!("structure fetch failed:", message.clone());
            show_toast(&message);
            true
        }
        Msg::ModuleSelected { cmid, name } => {
            component.selected_module = Some(SelectedModule { cmid, name });
            component.sections = None;
            component.chosen_section = 0;

            let course_id = ctx.props().current_course_id;
            let link = ctx.link().clone();
            spawn_local(async move {
                let url = format!("/api/library/sections/{}", course_id);
                match fetch_json::<Vec<SectionRef>>(&url).await {
                    Ok(sections) => link.send_message(Msg::SectionsLoaded(sections)),
                    Err(e) => link.send_message(Msg::SectionsFailed(e)),
                }
            });
            true
        }
        Msg::SectionsLoaded(sections) => {
            component.sections = Some(sections);
            true
        }
        Msg::SectionsFailed(message) => {
            component.reset_copy_form();
            show_toast(&message);
            true
        }
        Msg::SectionChosen(section) => {
            component.chosen_section = section;
            false
        }
        Msg::SubmitCopy => {
            let Some(selected) = component.selected_module.clone() else {
                show_toast("No template module selected");
                return false;
            };
            component.copying = true;

            let request = CopyActivityRequest {
                source_cmid: selected.cmid,
                target_course_id: ctx.props().current_course_id,
                target_section: component.chosen_section,
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                let response = match Request::post("/api/copy/activity").json(&request) {
                    Ok(request) => request.send().await,
                    Err(e) => {
                        link.send_message(Msg::CopyFailed(e.to_string()));
                        return;
                    }
                };
                match response {
                    Ok(resp) if resp.status() == 200 => match resp.json::<CopyOutcome>().await {
                        Ok(outcome) => link.send_message(Msg::CopyFinished(outcome)),
                        Err(e) => link.send_message(Msg::CopyFailed(e.to_string())),
                    },
                    Ok(resp) => {
                        let status = resp.status();
                        let body = resp
                            .text()
                            .await
                            .unwrap_or_else(|_| format!("Copy failed with status {}", status));
                        link.send_message(Msg::CopyFailed(body));
                    }
                    Err(e) => link.send_message(Msg::CopyFailed(e.to_string())),
                }
            });
            true
        }
        Msg::CopyFinished(outcome) => {
            component.copying = false;
            if outcome.status {
                show_toast("Module copied successfully");
                component.reset_copy_form();
                reload_after(RELOAD_DELAY_MS);
            } else {
                show_toast(&outcome.message);
            }
            true
        }
        Msg::CopyFailed(message) => {
            component.copying = false;
            gloo_console::warn!("copy failed:", message.clone());
            show_toast(&message);
            true
        }
        Msg::CancelCopy => {
            component.reset_copy_form();
            true
        }
    }
}
