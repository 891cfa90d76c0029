//! Dashboard components for the WebAssembly target.

pub mod present;

#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::rc::Rc;

    use crate::present::{
        bar_width, chart_points, format_value, quick_insights, status_icon, trend_icon, Route,
    };
    use crate::styles;
    use chrono::Utc;
    use health_core::{
        metric_series, threshold_for, Kpi, KpiConfig, MetricKind, PatientFilters, PatientStatus,
        SubjectReference,
    };
    use health_mock::{GeneratorConfig, MockStore};
    use wasm_bindgen::prelude::*;
    use web_sys::{console, Document, Element, HtmlInputElement, HtmlSelectElement, Window};
    use yew::events::{Event, InputEvent};
    use yew::prelude::*;
    use yew::TargetCast;

    const CHART_WIDTH: f64 = 300.0;
    const CHART_HEIGHT: f64 = 120.0;

    /// Shared store; props compare by identity.
    #[derive(Clone)]
    pub struct StoreHandle(Rc<MockStore>);

    impl PartialEq for StoreHandle {
        fn eq(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct AppProps {
        pub store: StoreHandle,
    }

    #[function_component(App)]
    fn app(props: &AppProps) -> Html {
        use_effect_with((), |_| {
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });

        let store = props.store.clone();
        let route = use_state(|| Route::Dashboard);
        let first_patient = store.0.all_patients().first().map(|p| p.id.clone());
        let selected = use_state(move || first_patient);

        let on_select_patient = {
            let route = route.clone();
            let selected = selected.clone();
            Callback::from(move |id: String| {
                selected.set(Some(id));
                route.set(Route::Dashboard);
            })
        };

        let nav = Route::ALL.into_iter().map(|target| {
            let route = route.clone();
            let is_active = *route == target;
            let onclick = Callback::from(move |_| route.set(target));
            html! {
                <button
                    type="button"
                    class={classes!("nav-link", is_active.then_some("is-active"))}
                    onclick={onclick}
                >
                    { target.label() }
                </button>
            }
        });

        let body = match *route {
            Route::Dashboard => html! {
                <DashboardView
                    store={store.clone()}
                    patient_id={(*selected).clone()}
                    on_select_patient={on_select_patient.clone()}
                />
            },
            Route::Patients => html! {
                <PatientListView store={store.clone()} on_select_patient={on_select_patient} />
            },
            Route::Reports => render_reports(),
            Route::Settings => render_settings(),
        };

        html! {
            <div class="health-shell">
                <nav class="health-nav" aria-label="Main navigation">
                    <span class="health-brand">{"Health Dashboard"}</span>
                    { for nav }
                </nav>
                <main class="health-main">{ body }</main>
            </div>
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct DashboardViewProps {
        pub store: StoreHandle,
        pub patient_id: Option<String>,
        pub on_select_patient: Callback<String>,
    }

    #[function_component(DashboardView)]
    fn dashboard_view(props: &DashboardViewProps) -> Html {
        let store = &props.store.0;
        let patient = props.patient_id.as_deref().and_then(|id| store.patient(id));

        let on_change = {
            let on_select = props.on_select_patient.clone();
            Callback::from(move |event: Event| {
                let select: HtmlSelectElement = event.target_unchecked_into();
                on_select.emit(select.value());
            })
        };

        let selector = html! {
            <select onchange={on_change} aria-label="Select patient">
                {
                    for store.all_patients().iter().map(|p| {
                        let is_selected = Some(p.id.as_str()) == props.patient_id.as_deref();
                        html! {
                            <option value={p.id.clone()} selected={is_selected}>
                                { format!("{} ({})", p.full_name(), p.id) }
                            </option>
                        }
                    })
                }
            </select>
        };

        let Some(patient) = patient else {
            return html! {
                <>
                    <header class="view-header toolbar">{ selector }</header>
                    <p class="empty-state">{"Select a patient to see their KPIs."}</p>
                </>
            };
        };

        let kpis = store.kpis(&patient.id, &KpiConfig::default());
        let history = store.metrics(&patient.id);
        let bmd_series: Vec<f64> = metric_series(history, MetricKind::BoneDensity)
            .into_iter()
            .map(|point| point.value)
            .collect();
        let hemoglobin_series: Vec<f64> = metric_series(history, MetricKind::Hemoglobin)
            .into_iter()
            .map(|point| point.value)
            .collect();

        html! {
            <>
                <header class="view-header">
                    <h1>{ patient.full_name() }</h1>
                    <p>{ format!("{} · {} · {}", patient.id, patient.mrn, patient.primary_physician) }</p>
                </header>
                <div class="toolbar">{ selector }</div>
                <section class="kpi-grid">
                    {
                        if kpis.is_empty() {
                            html! { <p class="empty-state">{"No metrics recorded for this patient."}</p> }
                        } else {
                            html! { for kpis.iter().map(render_kpi_card) }
                        }
                    }
                </section>
                <section class="chart-grid">
                    { render_chart("Bone density T-score", &bmd_series, "var(--chart-bmd)") }
                    { render_chart("Hemoglobin g/dL", &hemoglobin_series, "var(--chart-hemoglobin)") }
                    <div class="panel">
                        <h3>{"Quick insights"}</h3>
                        <ul class="insight-list">
                            {
                                for quick_insights(Some(patient)).into_iter().map(|(icon, text)| html! {
                                    <li><span>{ icon }</span>{" "}{ text }</li>
                                })
                            }
                        </ul>
                    </div>
                </section>
            </>
        }
    }

    fn render_kpi_card(kpi: &Kpi) -> Html {
        let status = kpi.status.as_str();
        html! {
            <article class="kpi-card" data-status={status}>
                <header>
                    <span>{ kpi.name.clone() }</span>
                    <span class="status-pill">{ format!("{} {}", status_icon(kpi.status), status) }</span>
                </header>
                <p class="kpi-value">
                    { format_value(kpi.value) }
                    <span class="kpi-unit">{ kpi.unit.clone() }</span>
                </p>
                <div class="kpi-bar" role="progressbar" aria-valuenow={format!("{:.0}", kpi.percentage)}>
                    <div class="kpi-bar-fill" style={bar_width(kpi.percentage)}></div>
                </div>
                <span class="kpi-trend">
                    { format!("{} {}", trend_icon(kpi.trend.direction), kpi.trend.caption()) }
                </span>
            </article>
        }
    }

    fn render_chart(title: &str, values: &[f64], color: &str) -> Html {
        let points = chart_points(values, CHART_WIDTH, CHART_HEIGHT);
        let latest = values.last().copied().map(format_value).unwrap_or_else(|| "--".to_string());
        html! {
            <div class="panel trend-chart">
                <h3>{ title }</h3>
                <svg viewBox="-4 -4 308 128" preserveAspectRatio="none" role="img" aria-label={title.to_string()}>
                    <polyline points={points} style={format!("stroke: {color}")} />
                </svg>
                <div class="axis-label">
                    <span>{ format!("{} months", values.len()) }</span>
                    <span>{ format!("Latest {latest}") }</span>
                </div>
            </div>
        }
    }

    #[derive(Clone, Default, PartialEq)]
    struct PatientFilterState {
        query: String,
        status: Option<PatientStatus>,
        doctor: String,
    }

    impl PatientFilterState {
        fn to_filters(&self) -> PatientFilters {
            PatientFilters {
                search_query: Some(self.query.clone()),
                doctor: Some(self.doctor.clone()).filter(|d| !d.is_empty()),
                status: self.status,
            }
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct PatientListViewProps {
        pub store: StoreHandle,
        pub on_select_patient: Callback<String>,
    }

    #[function_component(PatientListView)]
    fn patient_list_view(props: &PatientListViewProps) -> Html {
        let store = &props.store.0;
        let filters = use_state(PatientFilterState::default);
        let current = (*filters).clone();
        let patients = store.patients(&current.to_filters());

        let on_search = {
            let filters = filters.clone();
            Callback::from(move |event: InputEvent| {
                let input: HtmlInputElement = event.target_unchecked_into();
                let mut next = (*filters).clone();
                next.query = input.value();
                filters.set(next);
            })
        };

        let on_doctor = {
            let filters = filters.clone();
            Callback::from(move |event: Event| {
                let select: HtmlSelectElement = event.target_unchecked_into();
                let mut next = (*filters).clone();
                next.doctor = select.value();
                filters.set(next);
            })
        };

        let status_options = std::iter::once(None).chain(PatientStatus::ALL.into_iter().map(Some));
        let status_chips = status_options.map(|status| {
            let filters = filters.clone();
            let is_active = filters.status == status;
            let label = status.map(PatientStatus::as_str).unwrap_or("all");
            let onclick = Callback::from(move |_| {
                let mut next = (*filters).clone();
                next.status = status;
                filters.set(next);
            });
            html! {
                <button
                    type="button"
                    class={classes!("filter-chip", is_active.then_some("is-active"))}
                    onclick={onclick}
                >
                    { label }
                </button>
            }
        });

        html! {
            <>
                <header class="view-header">
                    <h1>{"Patients"}</h1>
                    <p>{ format!("{} of {} patients", patients.len(), store.all_patients().len()) }</p>
                </header>
                <div class="toolbar">
                    <input
                        type="search"
                        placeholder="Search by name, MRN, ID or physician"
                        value={current.query.clone()}
                        oninput={on_search}
                        aria-label="Search patients"
                    />
                    { for status_chips }
                    <select onchange={on_doctor} aria-label="Filter by physician">
                        <option value="" selected={current.doctor.is_empty()}>{"All physicians"}</option>
                        {
                            for store.doctors().into_iter().map(|doctor| html! {
                                <option value={doctor.to_string()} selected={current.doctor == doctor}>
                                    { doctor }
                                </option>
                            })
                        }
                    </select>
                </div>
                <div class="panel">
                    {
                        if patients.is_empty() {
                            html! { <p class="empty-state">{"No patients match the current filters."}</p> }
                        } else {
                            html! {
                                <table class="patient-table">
                                    <thead>
                                        <tr>
                                            <th>{"ID"}</th>
                                            <th>{"Name"}</th>
                                            <th>{"MRN"}</th>
                                            <th>{"Physician"}</th>
                                            <th>{"Status"}</th>
                                            <th>{"Last visit"}</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        {
                                            for patients.into_iter().map(|patient| {
                                                let id = patient.id.clone();
                                                let on_select = props.on_select_patient.clone();
                                                let onclick = Callback::from(move |_| on_select.emit(id.clone()));
                                                let last_visit = patient
                                                    .last_visit
                                                    .map(|dt| dt.format("%Y-%m-%d").to_string())
                                                    .unwrap_or_else(|| "--".to_string());
                                                html! {
                                                    <tr onclick={onclick}>
                                                        <td>{ patient.id.clone() }</td>
                                                        <td>{ patient.full_name() }</td>
                                                        <td>{ patient.mrn.clone() }</td>
                                                        <td>{ patient.primary_physician.clone() }</td>
                                                        <td>{ patient.status.as_str() }</td>
                                                        <td>{ last_visit }</td>
                                                    </tr>
                                                }
                                            })
                                        }
                                    </tbody>
                                </table>
                            }
                        }
                    }
                </div>
            </>
        }
    }

    fn render_reports() -> Html {
        let reports = [
            ("Monthly KPI summary", "Status and score of every KPI across the last 12 months."),
            ("Bone density progression", "T-score history with osteopenia and osteoporosis cut-offs."),
            ("Lab results export", "Hemoglobin, glucose, vitamin D and calcium readings."),
        ];
        html! {
            <>
                <header class="view-header">
                    <h1>{"Reports"}</h1>
                    <p>{"Report generation is not available for mock data."}</p>
                </header>
                <section class="kpi-grid">
                    {
                        for reports.into_iter().map(|(title, detail)| html! {
                            <article class="panel">
                                <h3>{ title }</h3>
                                <p class="empty-state">{ detail }</p>
                            </article>
                        })
                    }
                </section>
            </>
        }
    }

    fn render_settings() -> Html {
        let subject = SubjectReference::default();
        html! {
            <>
                <header class="view-header">
                    <h1>{"Settings"}</h1>
                    <p>{"Classification cut-points in use (hemoglobin shown for the male range)."}</p>
                </header>
                <div class="panel">
                    <table class="patient-table">
                        <thead>
                            <tr>
                                <th>{"KPI"}</th>
                                <th>{"Critical"}</th>
                                <th>{"Warning"}</th>
                                <th>{"Normal"}</th>
                                <th>{"Good"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            {
                                for MetricKind::ALL.into_iter().map(|kind| {
                                    let threshold = threshold_for(kind, &subject);
                                    html! {
                                        <tr>
                                            <td>{ kind.display_name() }</td>
                                            <td>{ format_value(threshold.critical) }</td>
                                            <td>{ format_value(threshold.warning) }</td>
                                            <td>{ format_value(threshold.normal) }</td>
                                            <td>{ format_value(threshold.good) }</td>
                                        </tr>
                                    }
                                })
                            }
                        </tbody>
                    </table>
                </div>
            </>
        }
    }

    #[wasm_bindgen]
    pub fn mount_dashboard(selector: &str, seed: Option<u32>) -> Result<(), JsValue> {
        let window: Window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Cannot access document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Invalid selector: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("No element matches the selector"))?;

        let config = GeneratorConfig {
            seed: seed.map(u64::from),
            ..GeneratorConfig::default()
        };
        let store = StoreHandle(Rc::new(MockStore::generate(&config, Utc::now())));

        yew::Renderer::<App>::with_root_and_props(target, AppProps { store }).render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_dashboard;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_dashboard(_: &str, _: Option<u32>) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "health-ui only supports the wasm32 target",
    ))
}
