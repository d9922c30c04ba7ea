//! Drawing each [Scene] onto a ratatui frame.

use crate::{
    config::BartConfig,
    gui::canvas::{FilledPolygon, Viewport},
    record::format_reward,
    stimulus::{
        balloon_radius, balloon_shape, explosion_shards, summary_text, Layout, Scene, NECK_SIZE,
    },
    Point,
};
use log::warn;
use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        block::Title,
        canvas::{Canvas, Context},
        *,
    },
};
use std::str::FromStr;

/// Colors and geometry shared by every scene.
#[derive(Debug, Clone)]
pub struct SceneStyle {
    pub layout: Layout,
    pub balloon: Color,
    pub text: Color,
    pub background: Color,
}

impl SceneStyle {
    pub fn from_config(config: &BartConfig) -> Self {
        let balloon = Color::from_str(&config.balloon_color).unwrap_or_else(|_| {
            warn!(
                "Could not parse balloon color {:?}, using red",
                config.balloon_color
            );
            Color::Red
        });
        Self {
            layout: Layout::new(config.screen_size),
            balloon,
            ..Self::default()
        }
    }
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            layout: Layout::new((1920.0, 1080.0)),
            balloon: Color::Rgb(0xB9, 0x15, 0x15),
            text: Color::Black,
            background: Color::Rgb(200, 200, 200),
        }
    }
}

/// Draw `scene` over the whole frame.
pub fn draw_scene(frame: &mut Frame, scene: &Scene, style: &SceneStyle) {
    let area = frame.size();
    match scene {
        Scene::Instructions(text) => frame.render_widget(message(text, style), area),
        Scene::Summary { earned, possible } => {
            frame.render_widget(message(&summary_text(*earned, *possible), style), area)
        }
        Scene::Balloon {
            inflation,
            cumulative_reward,
            run_reward,
        } => {
            let viewport = Viewport::fit((style.layout.width, style.layout.height), area);
            let shape = balloon_shape(
                style.layout.balloon_bottom(),
                NECK_SIZE,
                balloon_radius(*inflation),
            );
            let cumulative = format!("CUMULATIVE REWARD: ${}", cumulative_reward);
            let run = format!("RUN REWARD: {}", format_reward(*run_reward));
            let canvas = Canvas::default()
                .marker(Marker::Braille)
                .background_color(style.background)
                .x_bounds(viewport.x_bounds)
                .y_bounds(viewport.y_bounds)
                .paint(|ctx| {
                    for vertices in [&shape.body[..], &shape.neck[..]] {
                        ctx.draw(&FilledPolygon {
                            vertices,
                            color: style.balloon,
                            step: viewport.fill_step(),
                        });
                    }
                    ctx.layer();
                    label(ctx, style.layout.cumulative_text(), &cumulative, style);
                    label(ctx, style.layout.run_text(), &run, style);
                });
            frame.render_widget(canvas, area);
        }
        Scene::Explosion { show_reward } => {
            let viewport = Viewport::fit((style.layout.width, style.layout.height), area);
            let shards = explosion_shards(style.layout.middle());
            let pop = "*POP*";
            let reward = format!("RUN REWARD: {}", format_reward(0));
            let canvas = Canvas::default()
                .marker(Marker::Braille)
                .background_color(style.background)
                .x_bounds(viewport.x_bounds)
                .y_bounds(viewport.y_bounds)
                .paint(|ctx| {
                    for shard in &shards {
                        ctx.draw(&FilledPolygon {
                            vertices: shard,
                            color: style.balloon,
                            step: viewport.fill_step(),
                        });
                    }
                    ctx.layer();
                    let center = Point { x: 0.0, y: 0.0 };
                    let pop_at = Point {
                        x: viewport.centered_x(pop, center.x),
                        ..center
                    };
                    label(ctx, pop_at, pop, style);
                    if *show_reward {
                        let at = style.layout.explosion_reward_text();
                        let reward_at = Point {
                            x: viewport.centered_x(&reward, at.x),
                            ..at
                        };
                        label(ctx, reward_at, &reward, style);
                    }
                });
            frame.render_widget(canvas, area);
        }
    }
}

fn label(ctx: &mut Context, at: Point, text: &str, style: &SceneStyle) {
    ctx.print(
        at.x,
        at.y,
        Line::from(Span::styled(
            text.to_owned(),
            Style::default().fg(style.text).bg(style.background),
        )),
    );
}

/// A bordered block of centered text.
fn message<'a>(text: &'a str, style: &SceneStyle) -> Paragraph<'a> {
    let title = Title::from(" Balloon Analogue Risk Task ".bold());
    let block = Block::default()
        .title(title.alignment(Alignment::Center))
        .borders(Borders::ALL)
        .style(Style::default().fg(style.text).bg(style.background));
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(block)
}
