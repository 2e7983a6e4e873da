//! Game Renderer
//!
//! Flat-colour rectangles in a y-up world camera, then the HUD in screen
//! space. Layers draw in `LayerKind::ALL` order with the player slotted in
//! before the foreground.

use macroquad::prelude::*;

use crate::world::{Aabb, LayerKind, SpriteList};
use super::camera::FollowCamera;
use super::fps::FpsCounter;
use super::player::{AnimState, Facing, Player};
use super::runtime::Game;

const HUD_PANEL: Color = Color::new(0.96, 0.25, 0.35, 0.85);
const HUD_TEXT: Color = WHITE;
const HUD_FONT_SIZE: f32 = 20.0;

pub fn layer_color(kind: LayerKind) -> Color {
    match kind {
        LayerKind::Background => Color::from_rgba(70, 110, 180, 255),
        LayerKind::Platforms => Color::from_rgba(96, 70, 45, 255),
        LayerKind::MovingPlatforms => Color::from_rgba(140, 140, 150, 255),
        LayerKind::Ladders => Color::from_rgba(200, 160, 60, 255),
        LayerKind::Coins => Color::from_rgba(255, 215, 0, 255),
        LayerKind::DontTouch => Color::from_rgba(220, 40, 40, 255),
        LayerKind::Foreground => Color::from_rgba(40, 120, 40, 200),
    }
}

fn decoration_color() -> Color {
    Color::from_rgba(90, 90, 110, 160)
}

pub fn player_color(anim: AnimState) -> Color {
    match anim {
        AnimState::Idle => Color::from_rgba(30, 60, 200, 255),
        AnimState::Walking => Color::from_rgba(40, 90, 230, 255),
        AnimState::Jumping => Color::from_rgba(120, 60, 220, 255),
        AnimState::Climbing => Color::from_rgba(20, 150, 170, 255),
    }
}

/// World camera looking at the follow camera's viewport, y-up
pub fn world_camera(camera: &FollowCamera) -> Camera2D {
    Camera2D {
        target: camera.center(),
        zoom: vec2(2.0 / camera.viewport.x, 2.0 / camera.viewport.y),
        ..Default::default()
    }
}

fn draw_aabb(b: &Aabb, color: Color) {
    draw_rectangle(b.left(), b.bottom(), b.size().x, b.size().y, color);
}

fn draw_layer(list: &SpriteList, color: Color) {
    for sprite in list.iter() {
        draw_aabb(&sprite.bounds, color);
    }
}

fn draw_player(player: &Player) {
    let b = player.bounds();
    draw_aabb(&b, player_color(player.anim));

    // Eye on the facing side; bobs with the animation frame
    let eye = 8.0;
    let x = match player.facing {
        Facing::Left => b.left() + 6.0,
        Facing::Right => b.right() - 6.0 - eye,
    };
    let bob = player.texture_index() as f32 % 2.0 * 2.0;
    draw_rectangle(x, b.top() - 20.0 + bob, eye, eye, WHITE);
}

/// Draw the world through the follow camera, then the HUD
pub fn draw_game(game: &Game, fps: &FpsCounter) {
    let (r, g, b) = game.level.background;
    clear_background(Color::from_rgba(r, g, b, 255));

    set_camera(&world_camera(&game.camera));

    for (_, list) in &game.level.decorations {
        draw_layer(list, decoration_color());
    }
    for kind in LayerKind::ALL {
        if kind == LayerKind::Foreground {
            draw_player(&game.player);
        }
        if let Some(list) = game.level.layer(kind) {
            draw_layer(list, layer_color(kind));
        }
    }

    set_default_camera();
    draw_hud(&HudInfo::from_game(game, fps));
}

/// Values shown on the HUD
#[derive(Debug, Clone, PartialEq)]
pub struct HudInfo {
    pub score: u32,
    pub coins_left: usize,
    pub seconds: f32,
    pub lives: u32,
    pub level: u32,
    pub fps: f64,
}

impl HudInfo {
    pub fn from_game(game: &Game, fps: &FpsCounter) -> Self {
        Self {
            score: game.score,
            coins_left: game.coins_left(),
            seconds: game.level_time,
            lives: game.lives,
            level: game.level_number,
            fps: fps.get_fps(),
        }
    }

    /// Left column labels, top to bottom
    pub fn labels(&self) -> [String; 5] {
        [
            format!("Score: {}", self.score),
            format!("Coins Left: {}", self.coins_left),
            format!("Time: {}", self.seconds.round() as u32),
            format!("Lives: {}", self.lives),
            format!("Level: {}", self.level),
        ]
    }

    pub fn fps_label(&self) -> String {
        format!("FPS: {}", self.fps.round() as u32)
    }
}

fn draw_hud(info: &HudInfo) {
    let sw = screen_width();

    let panel_w = sw / 7.0;
    let line_h = HUD_FONT_SIZE + 4.0;
    let labels = info.labels();
    draw_rectangle(0.0, 0.0, panel_w.max(150.0), line_h * labels.len() as f32 + 12.0, HUD_PANEL);

    for (i, label) in labels.iter().enumerate() {
        draw_text(label, 8.0, line_h * (i as f32 + 1.0), HUD_FONT_SIZE, HUD_TEXT);
    }

    let fps = info.fps_label();
    draw_text(&fps, sw * 0.9, line_h, HUD_FONT_SIZE, HUD_TEXT);
}
