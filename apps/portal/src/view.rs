//! Screen rendering. Every function here is a pure function of the session snapshot.

use client_core::{DashboardData, SessionSnapshot, View};
use shared::domain::{CourseSummary, UserType};

pub const BRAND: &str = "Carolina Machado";
pub const TAGLINE: &str = "Educação em Saúde";
pub const DEFAULT_THUMBNAIL_URL: &str = "https://images.unsplash.com/photo-1576091160399-112ba8d25d1f?ixlib=rb-4.0.3&auto=format&fit=crop&w=1000&q=80";
pub const NO_COURSES_MESSAGE: &str = "Nenhum curso disponível no momento.";
const RULE: &str = "------------------------------------------------------------";

pub fn render(snapshot: &SessionSnapshot) -> String {
    let mut out = render_header(snapshot);
    out.push_str(&render_content(snapshot));
    out.push_str(&render_footer());
    out
}

pub fn render_content(snapshot: &SessionSnapshot) -> String {
    match snapshot.active_view {
        View::Home => render_home(),
        View::Login => render_login(snapshot),
        View::Register => render_register(snapshot),
        View::Courses => render_courses(&snapshot.courses),
        View::Dashboard => render_dashboard(snapshot),
    }
}

fn push_line(out: &mut String, text: impl AsRef<str>) {
    out.push_str(text.as_ref());
    out.push('\n');
}

fn nav_item(label: &str, view: View, active: View) -> String {
    if view == active {
        format!("[{label}]")
    } else {
        format!(" {label} ")
    }
}

pub fn render_header(snapshot: &SessionSnapshot) -> String {
    let active = snapshot.active_view;
    let mut items = vec![
        nav_item("Início", View::Home, active),
        nav_item("Cursos", View::Courses, active),
    ];
    match &snapshot.user {
        Some(user) => {
            items.push(nav_item("Dashboard", View::Dashboard, active));
            items.push(format!("Olá, {}", user.name));
            items.push("Sair".to_string());
        }
        None => {
            items.push(nav_item("Entrar", View::Login, active));
            items.push(nav_item("Registrar-se", View::Register, active));
        }
    }

    let mut out = String::new();
    push_line(&mut out, RULE);
    push_line(&mut out, format!("{BRAND}  ·  {TAGLINE}"));
    push_line(&mut out, items.join(" "));
    push_line(&mut out, RULE);
    out
}

pub fn render_footer() -> String {
    let mut out = String::new();
    push_line(&mut out, RULE);
    push_line(
        &mut out,
        format!("© 2024 {BRAND} - {TAGLINE}. Todos os direitos reservados."),
    );
    out
}

pub fn render_home() -> String {
    let mut out = String::new();
    push_line(&mut out, "Transforme sua carreira na área da saúde");
    push_line(
        &mut out,
        "Aprenda com os melhores profissionais da área de enfermagem, medicina e saúde.",
    );
    push_line(
        &mut out,
        "Cursos práticos e atualizados para sua formação profissional.",
    );
    push_line(&mut out, "  > Ver Cursos (courses)   > Comece Agora (register)");
    push_line(&mut out, "");
    push_line(&mut out, "Por que escolher nossos cursos?");
    push_line(
        &mut out,
        "Formação completa com os melhores profissionais da área",
    );
    for (title, body) in [
        (
            "Qualidade Certificada",
            "Cursos certificados por profissionais reconhecidos na área da saúde",
        ),
        (
            "Conteúdo Atualizado",
            "Material sempre atualizado com as últimas práticas e protocolos",
        ),
        (
            "Comunidade Ativa",
            "Faça parte de uma comunidade de profissionais da saúde",
        ),
    ] {
        push_line(&mut out, format!("  * {title}: {body}"));
    }
    out
}

fn push_error(out: &mut String, snapshot: &SessionSnapshot) {
    if let Some(error) = &snapshot.last_error {
        push_line(out, format!("  ! {error}"));
    }
}

pub fn render_login(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    push_line(&mut out, "Login");
    push_error(&mut out, snapshot);
    push_line(&mut out, "  login <email> <senha>");
    let submit = if snapshot.pending_request {
        "Entrando..."
    } else {
        "Entrar"
    };
    push_line(&mut out, format!("  [{submit}]"));
    push_line(&mut out, "Não tem conta? Registrar-se (register)");
    out
}

pub fn render_register(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    push_line(&mut out, "Registrar-se");
    push_error(&mut out, snapshot);
    push_line(
        &mut out,
        "  register <email> <senha> <estudante|instrutor> <nome completo>",
    );
    let submit = if snapshot.pending_request {
        "Registrando..."
    } else {
        "Registrar"
    };
    push_line(&mut out, format!("  [{submit}]"));
    push_line(&mut out, "Já tem conta? Entrar (login)");
    out
}

/// Two decimals, as shown on the catalog cards.
pub fn format_price(price: f64) -> String {
    format!("R$ {price:.2}")
}

pub fn user_type_label(user_type: UserType) -> &'static str {
    match user_type {
        UserType::Student => "Estudante",
        UserType::Instructor => "Instrutor",
        UserType::Admin => "Administrador",
    }
}

pub fn render_course_card(course: &CourseSummary) -> String {
    let mut out = String::new();
    push_line(&mut out, format!("+ {}", course.title));
    push_line(
        &mut out,
        format!("  [{}]  {}", course.level, format_price(course.price)),
    );
    push_line(&mut out, format!("  {}", course.description));
    push_line(
        &mut out,
        format!(
            "  Por {}  ·  {}h",
            course.instructor_name, course.duration_hours
        ),
    );
    let thumbnail = course
        .thumbnail_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_THUMBNAIL_URL);
    push_line(&mut out, format!("  {thumbnail}"));
    push_line(&mut out, format!("  Ver Detalhes: details {}", course.course_id));
    out
}

pub fn render_courses(courses: &[CourseSummary]) -> String {
    let mut out = String::new();
    push_line(&mut out, "Cursos Disponíveis");
    if courses.is_empty() {
        push_line(&mut out, NO_COURSES_MESSAGE);
        return out;
    }
    for course in courses {
        out.push_str(&render_course_card(course));
    }
    out
}

/// Empty when nobody is signed in; the active view can point here regardless.
pub fn render_dashboard(snapshot: &SessionSnapshot) -> String {
    let Some(user) = &snapshot.user else {
        return String::new();
    };

    let mut out = String::new();
    push_line(&mut out, "Dashboard");
    push_line(&mut out, format!("Bem-vindo, {}!", user.name));
    match user.user_type {
        UserType::Admin => render_admin_panel(&mut out, snapshot),
        UserType::Instructor => render_instructor_panel(&mut out, snapshot),
        UserType::Student => render_student_panel(&mut out),
    }
    out
}

fn render_admin_panel(out: &mut String, snapshot: &SessionSnapshot) {
    let stats = match &snapshot.dashboard {
        DashboardData::Admin(stats) => Some(stats),
        _ => None,
    };
    let or_dash = |value: Option<u64>| value.map_or_else(|| "-".to_string(), |v| v.to_string());

    push_line(
        out,
        format!(
            "  Total de Usuários: {}",
            or_dash(stats.map(|s| s.total_users))
        ),
    );
    let total_courses = stats.map_or(snapshot.courses.len() as u64, |s| s.total_courses);
    push_line(out, format!("  Total de Cursos: {total_courses}"));
    push_line(
        out,
        format!(
            "  Instrutores: {}",
            or_dash(stats.map(|s| s.total_instructors))
        ),
    );
    push_line(out, "  Receita Total: R$ 0,00");
}

fn render_instructor_panel(out: &mut String, snapshot: &SessionSnapshot) {
    push_line(out, "Meus Cursos");
    push_line(out, "  [Criar Novo Curso]");
    push_line(
        out,
        "  Aqui você pode gerenciar seus cursos, ver estatísticas e criar novos conteúdos.",
    );
    if let DashboardData::Instructor(courses) = &snapshot.dashboard {
        for course in courses {
            push_line(
                out,
                format!("  - {} ({})", course.title, format_price(course.price)),
            );
        }
    }
}

fn render_student_panel(out: &mut String) {
    push_line(out, "Meus Cursos");
    push_line(
        out,
        "  Aqui você pode ver seus cursos inscritos e continuar seus estudos.",
    );
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
