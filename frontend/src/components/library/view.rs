//! View rendering for the module library picker: the template-course
//! dropdown, the section/module listing with per-module copy buttons, and
//! the copy form with its target-section dropdown.

use common::model::structure::TemplateSection;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use super::messages::Msg;
use super::state::LibraryComponent;

pub fn view(component: &LibraryComponent, ctx: &Context<LibraryComponent>) -> Html {
    html! {
        <div id="modulelibrary-block">
            { build_course_select(component, ctx) }
            {
                if component.loading_structure {
                    html! { <p id="modulelibrary-loading">{"Loading…"}</p> }
                } else {
                    html! {}
                }
            }
            { build_module_list(component, ctx) }
            { build_copy_form(component, ctx) }
        </div>
    }
}

fn build_course_select(component: &LibraryComponent, ctx: &Context<LibraryComponent>) -> Html {
    let link = ctx.link();
    let onchange = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::CourseSelected(select.value().parse::<i64>().ok())
    });

    html! {
        <select id="modulelibrary-course-select" {onchange}>
            <option value="" selected={component.selected_course.is_none()}>
                {"Choose a course..."}
            </option>
            {
                for ctx.props().courses.iter().map(|course| {
                    let selected = component.selected_course == Some(course.id);
                    html! {
                        <option value={course.id.to_string()} {selected}>
                            { &course.fullname }
                        </option>
                    }
                })
            }
        </select>
    }
}

fn build_module_list(component: &LibraryComponent, ctx: &Context<LibraryComponent>) -> Html {
    let Some(structure) = &component.structure else {
        return html! { <div id="modulelibrary-modules"></div> };
    };
    if structure.sections.is_empty() {
        return html! {
            <div id="modulelibrary-modules"><p>{"No modules found in this course."}</p></div>
        };
    }
    html! {
        <div id="modulelibrary-modules">
            <h4>{ &structure.title }</h4>
            { for structure.sections.iter().map(|section| build_section(section, ctx)) }
        </div>
    }
}

fn build_section(section: &TemplateSection, ctx: &Context<LibraryComponent>) -> Html {
    let link = ctx.link();
    html! {
        <>
            <h5>{ format!("Section {} - {}", section.section, section.name) }</h5>
            <ul>
                {
                    for section.modules.iter().map(|module| {
                        let cmid = module.cmid;
                        let name = module.name.clone();
                        let onclick = link.callback(move |_| Msg::ModuleSelected {
                            cmid,
                            name: name.clone(),
                        });
                        html! {
                            <li>
                                { format!("{}: {}", module.modname, module.name) }
                                {" "}
                                <button type="button" class="select-template-module-btn" {onclick}>
                                    {"Copy this module"}
                                </button>
                            </li>
                        }
                    })
                }
            </ul>
        </>
    }
}

fn build_copy_form(component: &LibraryComponent, ctx: &Context<LibraryComponent>) -> Html {
    let link = ctx.link();
    let Some(selected) = &component.selected_module else {
        return html! { <div id="modulelibrary-copy-form"></div> };
    };
    let Some(sections) = &component.sections else {
        return html! {
            <div id="modulelibrary-copy-form"><p>{"Loading target sections..."}</p></div>
        };
    };

    let onchange = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::SectionChosen(select.value().parse::<i64>().unwrap_or(0))
    });
    let onsubmit = link.callback(|e: SubmitEvent| {
        e.prevent_default();
        Msg::SubmitCopy
    });
    let oncancel = link.callback(|_| Msg::CancelCopy);

    html! {
        <div id="modulelibrary-copy-form">
            <form id="copy-assessment-form" {onsubmit}>
                <p>{ format!("Copy \"{}\"? This will copy structure only, without user data.", selected.name) }</p>
                <label for="target-section">{"Select target section:"}</label>
                <select id="target-section" {onchange}>
                    <option value="0" selected={component.chosen_section == 0}>
                        {"Append at end"}
                    </option>
                    {
                        for sections.iter().filter(|s| s.section != 0).map(|section| {
                            let selected = component.chosen_section == section.section;
                            html! {
                                <option value={section.section.to_string()} {selected}>
                                    { format!("{}: {}", section.section, section.name) }
                                </option>
                            }
                        })
                    }
                </select>
                <button type="submit" disabled={component.copying}>{"Confirm copy"}</button>
                <button type="button" id="cancel-copy-btn" onclick={oncancel}>{"Cancel"}</button>
            </form>
        </div>
    }
}
