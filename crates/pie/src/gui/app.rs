use crate::config::{self, Overrides};
use crate::events::AppEvent;
use crate::gui::chart::{self, DEFAULT_SIZE, MIN_SIZE, State};
use crate::gui::theme::{self, ThemeColors};
use divvy::{Change, Geometry, Point};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub state: Rc<RefCell<State>>,
    pub overrides: Overrides,
    pub summary: String,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Press(Point),
    Release,
    CursorMove(Point),
    Scroll(f64),
    Changed(Change),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

/// Forwards every value change of the slider into the component.
fn connect_changes(state: &mut State, sender: &ComponentSender<AppModel>) {
    let sender = sender.clone();
    state.connect(move |change| sender.input(AppMsg::Changed(*change)));
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (State, Overrides, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Pie"),
            add_css_class: "pie-window",

            gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                set_spacing: 12,

                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    set_content_width: DEFAULT_SIZE,
                    set_content_height: DEFAULT_SIZE,
                    set_size_request: (MIN_SIZE, MIN_SIZE),
                    add_css_class: "pie-drawing-area",

                    add_controller = gtk::EventControllerMotion {
                        connect_motion[sender] => move |_, x, y| {
                            sender.input(AppMsg::CursorMove(Point::new(x, y)));
                        }
                    },

                    add_controller = gtk::GestureClick {
                        set_button: 1, // primary only
                        connect_pressed[sender] => move |_, _, x, y| {
                            sender.input(AppMsg::Press(Point::new(x, y)));
                        },
                        connect_released[sender] => move |_, _, _, _| {
                            sender.input(AppMsg::Release);
                        }
                    },

                    add_controller = gtk::EventControllerScroll::new(
                        gtk::EventControllerScrollFlags::VERTICAL
                    ) {
                        connect_scroll[sender] => move |_, _, dy| {
                            sender.input(AppMsg::Scroll(dy));
                            glib::Propagation::Stop
                        }
                    }
                },

                gtk::Label {
                    set_margin_start: 12,
                    set_margin_end: 12,
                    set_valign: gtk::Align::Center,
                    set_xalign: 0.0,
                    add_css_class: "pie-summary",
                    #[watch]
                    set_label: &model.summary,
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (mut state, overrides, rx) = init;

        theme::load_css();
        connect_changes(&mut state, &sender);

        let model = AppModel {
            summary: state.summary(),
            state: Rc::new(RefCell::new(state)),
            overrides,
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let state_draw = model.state.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let state = state_draw.borrow();
                let geometry = Geometry::fit(width as f64, height as f64, state.metrics());
                if let Err(e) = chart::draw(cr, &state, &geometry, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        let redraw = match msg {
            AppMsg::Press(point) => {
                let mut state = self.sync_geometry();
                state.press(point)
            }
            AppMsg::Release => self.state.borrow_mut().release(),
            AppMsg::CursorMove(point) => {
                let mut state = self.sync_geometry();
                state.update_cursor(point)
            }
            AppMsg::Scroll(dy) => {
                let mut state = self.sync_geometry();
                state.scroll(dy)
            }
            AppMsg::Changed(change) => {
                log::trace!("{}", change);
                self.summary = self.state.borrow().summary();
                true
            }
            AppMsg::ConfigReload => {
                self.reload(&sender);
                true
            }
        };

        if redraw {
            self.drawing_area.queue_draw();
        }
    }
}

impl AppModel {
    /// Borrows the state with the chart fitted to the current allocation.
    fn sync_geometry(&self) -> std::cell::RefMut<'_, State> {
        let mut state = self.state.borrow_mut();
        let (width, height) = (self.drawing_area.width(), self.drawing_area.height());
        state.resize(width as f64, height as f64);
        state
    }

    fn reload(&mut self, sender: &ComponentSender<Self>) {
        let mut new_config = match config::load_config() {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                return;
            }
        };
        self.overrides.apply(&mut new_config);

        let mut state = self.state.borrow_mut();
        match state.apply_config(&new_config) {
            Ok(rebuilt) => {
                if rebuilt {
                    connect_changes(&mut state, sender);
                }
                self.summary = state.summary();
                log::info!("Configuration reloaded");
            }
            Err(e) => log::error!("Rejected reloaded config: {}", e),
        }
    }
}
