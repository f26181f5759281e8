use super::*;

use shared::domain::{AdminStats, CourseId, User, UserId};

fn user(user_type: UserType) -> User {
    User {
        id: UserId::from("u-1"),
        name: "Ana Souza".to_string(),
        email: "ana@b.com".to_string(),
        user_type,
    }
}

fn course(thumbnail_url: Option<&str>) -> CourseSummary {
    CourseSummary {
        course_id: CourseId::from("c-1"),
        title: "Primeiros Socorros".to_string(),
        description: "Atendimento inicial".to_string(),
        thumbnail_url: thumbnail_url.map(str::to_string),
        level: "iniciante".to_string(),
        price: 99.9,
        instructor_name: "Carolina Machado".to_string(),
        duration_hours: 10,
    }
}

fn snapshot_at(view: View, user: Option<User>) -> SessionSnapshot {
    SessionSnapshot {
        active_view: view,
        user,
        ..SessionSnapshot::default()
    }
}

#[test]
fn dashboard_without_user_renders_nothing() {
    let snapshot = snapshot_at(View::Dashboard, None);

    assert_eq!(render_dashboard(&snapshot), "");
    assert_eq!(render_content(&snapshot), "");

    let page = render(&snapshot);
    assert!(page.contains(BRAND));
    assert!(!page.contains("Bem-vindo"));
}

#[test]
fn header_reflects_authentication_and_active_view() {
    let signed_out = render_header(&snapshot_at(View::Login, None));
    assert!(signed_out.contains("[Entrar]"));
    assert!(signed_out.contains("Registrar-se"));
    assert!(!signed_out.contains("Sair"));

    let signed_in = render_header(&snapshot_at(View::Courses, Some(user(UserType::Student))));
    assert!(signed_in.contains("[Cursos]"));
    assert!(signed_in.contains("Olá, Ana Souza"));
    assert!(signed_in.contains("Sair"));
    assert!(!signed_in.contains("Entrar"));
}

#[test]
fn login_form_shows_error_and_pending_label() {
    let mut snapshot = snapshot_at(View::Login, None);
    snapshot.last_error = Some("Credenciais inválidas".to_string());
    snapshot.pending_request = true;

    let form = render_login(&snapshot);
    assert!(form.contains("! Credenciais inválidas"));
    assert!(form.contains("[Entrando...]"));

    snapshot.pending_request = false;
    snapshot.last_error = None;
    let form = render_login(&snapshot);
    assert!(form.contains("[Entrar]"));
    assert!(!form.contains('!'));
}

#[test]
fn register_form_switches_submit_label_while_pending() {
    let mut snapshot = snapshot_at(View::Register, None);
    snapshot.pending_request = true;
    assert!(render_register(&snapshot).contains("[Registrando...]"));
}

#[test]
fn empty_catalog_shows_placeholder_message() {
    let listing = render_courses(&[]);
    assert!(listing.contains("Cursos Disponíveis"));
    assert!(listing.contains(NO_COURSES_MESSAGE));
}

#[test]
fn course_card_formats_price_hours_and_default_thumbnail() {
    let card = render_course_card(&course(None));
    assert!(card.contains("R$ 99.90"));
    assert!(card.contains("Por Carolina Machado"));
    assert!(card.contains("10h"));
    assert!(card.contains(DEFAULT_THUMBNAIL_URL));
    assert!(card.contains("details c-1"));

    let card = render_course_card(&course(Some("https://cdn.example.com/c1.jpg")));
    assert!(card.contains("https://cdn.example.com/c1.jpg"));
    assert!(!card.contains(DEFAULT_THUMBNAIL_URL));
}

#[test]
fn admin_dashboard_counts_catalog_until_stats_arrive() {
    let mut snapshot = snapshot_at(View::Dashboard, Some(user(UserType::Admin)));
    snapshot.courses = vec![course(None), course(None)];

    let panel = render_dashboard(&snapshot);
    assert!(panel.contains("Bem-vindo, Ana Souza!"));
    assert!(panel.contains("Total de Usuários: -"));
    assert!(panel.contains("Total de Cursos: 2"));
    assert!(panel.contains("Receita Total: R$ 0,00"));

    snapshot.dashboard = DashboardData::Admin(AdminStats {
        total_users: 40,
        total_courses: 7,
        total_instructors: 5,
        total_students: 34,
    });
    let panel = render_dashboard(&snapshot);
    assert!(panel.contains("Total de Usuários: 40"));
    assert!(panel.contains("Total de Cursos: 7"));
    assert!(panel.contains("Instrutores: 5"));
}

#[test]
fn instructor_and_student_dashboards_show_their_sections() {
    let mut instructor = snapshot_at(View::Dashboard, Some(user(UserType::Instructor)));
    instructor.dashboard = DashboardData::Instructor(vec![course(None)]);
    let panel = render_dashboard(&instructor);
    assert!(panel.contains("Criar Novo Curso"));
    assert!(panel.contains("- Primeiros Socorros (R$ 99.90)"));

    let student = render_dashboard(&snapshot_at(View::Dashboard, Some(user(UserType::Student))));
    assert!(student.contains("Meus Cursos"));
    assert!(student.contains("cursos inscritos"));
    assert!(!student.contains("Criar Novo Curso"));
}

#[test]
fn home_is_the_default_screen() {
    let page = render(&SessionSnapshot::default());
    assert!(page.contains("Transforme sua carreira na área da saúde"));
    assert!(page.contains("Todos os direitos reservados."));
}
