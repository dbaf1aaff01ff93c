//! Block widget shell.
//!
//! Renders nothing unless the page is in editing mode (taken from the query
//! string, where the host page puts it). When editing, it resolves the
//! template category's courses through the backend and mounts the library
//! picker with the current course id. A failed course-list fetch degrades
//! to an empty list rather than failing the render.

use crate::components::library::LibraryComponent;
use common::model::course::CourseSummary;
use gloo_net::http::Request;
use yew::platform::spawn_local;
use yew::{html, Component, Context, Html};

pub enum AppMsg {
    CoursesLoaded(Vec<CourseSummary>),
}

pub struct App {
    editing: bool,
    current_course_id: i64,
    courses: Option<Vec<CourseSummary>>,
}

fn query_param(name: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search).ok()?.get(name)
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let editing = matches!(query_param("editing").as_deref(), Some("1") | Some("true"));
        let current_course_id = query_param("course")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        Self {
            editing,
            current_course_id,
            courses: None,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::CoursesLoaded(courses) => {
                self.courses = Some(courses);
                true
            }
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && self.editing {
            let link = ctx.link().clone();
            spawn_local(async move {
                let courses = match Request::get("/api/library/courses").send().await {
                    Ok(resp) if resp.status() == 200 => {
                        resp.json::<Vec<CourseSummary>>().await.unwrap_or_default()
                    }
                    _ => {
                        gloo_console::warn!("template course list unavailable");
                        Vec::new()
                    }
                };
                link.send_message(AppMsg::CoursesLoaded(courses));
            });
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        if !self.editing {
            return html! {};
        }
        match &self.courses {
            None => html! { <p id="modulelibrary-loading">{"Loading…"}</p> },
            Some(courses) => html! {
                <LibraryComponent
                    current_course_id={self.current_course_id}
                    courses={courses.clone()}
                />
            },
        }
    }
}
