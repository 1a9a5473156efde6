use std::{cell::RefCell, rc::Rc};

use slate::{
    tokio::runtime,
    widget::{search_field, timer, toggle, SearchField, Timer, Toggle},
    Geometry, Key, Point, Renderer, Scheduler, TextEngine, Theme,
    Ui, WidgetEvent, WidgetEventKind, WidgetId
};
use tiny_skia::Pixmap;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const WIDTH: u32 = 420;
const HEIGHT: u32 = 240;

const CITIES: &[&str] = &[
    "Tokyo", "Toronto", "London", "Lisbon", "Melbourne", "Montreal"
];

const COUNTDOWN_SECS: i64 = 3;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    // Widgets are single threaded; the runtime only drives the timer
    // intervals.
    let runtime = match runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("Failed to build the async runtime: {err}");

            return;
        }
    };

    runtime.block_on(run());
}

async fn run() {
    let engine = TextEngine::new();
    let mut ui = Ui::new(Theme::light(), Box::new(engine.clone()));
    let (scheduler, mut ticks) = Scheduler::new(runtime::Handle::current());

    let theme = ui.theme().clone();
    let events: Rc<RefCell<Vec<WidgetEvent>>> = Rc::default();

    let field = ui.insert(|id| {
        Box::new(SearchField::new(
            id,
            search_field::Config {
                geometry: Geometry::new(20f32, 20f32)
                    .with_width(220f32)
                    .with_height(32f32),
                array: CITIES.iter().map(|x| x.to_string()).collect(),
                ..search_field::Config::default()
            },
            &theme
        ))
    });

    let toggle = ui.insert(|id| {
        Box::new(Toggle::new(
            id,
            toggle::Config {
                geometry: Geometry::new(20f32, 80f32),
                ..toggle::Config::default()
            },
            &theme
        ))
    });

    let timer = ui.insert(|id| {
        Box::new(Timer::new(
            id,
            timer::Config {
                geometry: Geometry::new(20f32, 140f32)
                    .with_width(120f32)
                    .with_height(32f32),
                border: Some(slate::Color::BLACK),
                ..timer::Config::default()
            },
            &theme,
            scheduler.clone()
        ))
    });

    for id in [field, toggle, timer] {
        subscribe(&mut ui, id, &events);
    }

    let mut clock = 0u64;
    let mut next = move || {
        clock += 16;
        clock
    };

    // Type "to" into the field and accept the suggested completion.
    ui.pointer_moved(Point::new(30f32, 30f32), next());
    ui.pointer_pressed(next());
    ui.pointer_released(next());

    for key in [Key::Char('t'), Key::Char('o'), Key::ArrowRight] {
        ui.key_down(key, next());
    }

    if let Some(field) = ui.get::<SearchField>(field) {
        info!("Search field settled on {:?}", field.text());
    }

    // Flip the toggle on; the drained `ToggleOn` arms the countdown.
    ui.pointer_moved(Point::new(30f32, 90f32), next());
    ui.pointer_pressed(next());
    ui.pointer_released(next());

    drain(&mut ui, &events, timer);

    while ui.get::<Timer>(timer).map_or(false, Timer::is_running) {
        let Some(tick) = ticks.recv().await else {
            break;
        };

        ui.deliver_tick(tick);
        drain(&mut ui, &events, timer);
    }

    save_frame(&mut ui, engine);
}

fn subscribe(ui: &mut Ui, id: WidgetId, events: &Rc<RefCell<Vec<WidgetEvent>>>) {
    let sink = Rc::clone(events);
    let listener = move |event: &WidgetEvent| {
        sink.borrow_mut().push(*event);
    };

    // Listeners borrow nothing from the ui, so reactions to the emitted
    // events happen in `drain`, after the dispatch pass completes.
    if let Some(field) = ui.get_mut::<SearchField>(id) {
        field.subscribe(listener);
    } else if let Some(toggle) = ui.get_mut::<Toggle>(id) {
        toggle.subscribe(listener);
    } else if let Some(timer) = ui.get_mut::<Timer>(id) {
        timer.subscribe(listener);
    }
}

fn drain(ui: &mut Ui, events: &Rc<RefCell<Vec<WidgetEvent>>>, timer: WidgetId) {
    let drained = events.borrow_mut().split_off(0);

    for event in drained {
        match event.kind {
            WidgetEventKind::TextChanged => {
                let text = ui.get::<SearchField>(event.source)
                    .map(|x| x.text().to_owned())
                    .unwrap_or_default();

                info!("Text changed: {text:?}");
            }
            WidgetEventKind::ToggleOn => {
                info!("Toggle on, starting a {COUNTDOWN_SECS}s countdown.");

                let armed = ui.with_widget::<Timer, _>(timer, |timer, measurer| {
                    timer.set_duration(COUNTDOWN_SECS, measurer);
                    timer.start();
                });

                if armed.is_none() {
                    error!("The timer widget is gone.");
                }
            }
            WidgetEventKind::ToggleOff => {
                if let Some(timer) = ui.get_mut::<Timer>(timer) {
                    timer.stop(event.time_stamp);
                }
            }
            WidgetEventKind::TimerFinished => {
                info!("Countdown finished at t={}ms.", event.time_stamp);
            }
        }
    }
}

fn save_frame(ui: &mut Ui, engine: TextEngine) {
    let Some(mut pixmap) = Pixmap::new(WIDTH, HEIGHT) else {
        error!("Failed to allocate the output pixmap.");

        return;
    };

    pixmap.fill(tiny_skia::Color::WHITE);

    let mut renderer = Renderer::new(engine);
    ui.draw(&mut renderer);
    renderer.render(&mut pixmap.as_mut());

    match pixmap.save_png("demo.png") {
        Ok(()) => info!("Wrote demo.png"),
        Err(err) => error!("Failed to write demo.png: {err}")
    }
}
