//! Built-in templates, used when no template directory is configured or
//! a name is missing from it.

static DEFAULTS: &[(&str, &str)] = &[
    ("base.html", BASE),
    ("index.html", INDEX),
    ("lesson.html", LESSON),
    ("partials/header.html", HEADER),
    ("partials/footer.html", FOOTER),
    ("partials/styles.html", STYLES),
    ("partials/scripts.html", SCRIPTS),
    ("partials/index_header.html", INDEX_HEADER),
    ("partials/lesson_header.html", LESSON_HEADER),
    ("partials/module_card.html", MODULE_CARD),
    ("partials/lesson_item.html", LESSON_ITEM),
    ("partials/slide.html", SLIDE),
    ("partials/activity.html", ACTIVITY),
    ("partials/worked_example.html", WORKED_EXAMPLE),
    ("partials/assessment.html", ASSESSMENT),
    ("partials/question.html", QUESTION),
    ("partials/question_open.html", QUESTION_OPEN),
    ("partials/completion.html", COMPLETION),
];

/// Look up a built-in template by name, e.g. `base.html` or
/// `partials/styles.html`.
pub fn default_template(name: &str) -> Option<&'static str> {
    DEFAULTS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, text)| *text)
}

const BASE: &str = r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width,initial-scale=1">
  <title>{{ title }}</title>
  {{> styles }}
</head>
<body data-course-id="{{ course_id }}" data-total-lessons="{{ total_lessons }}">
  {{> header }}
  <main>
    <div class="container">
      {{ content }}
    </div>
  </main>
  {{> footer }}
  {{> scripts }}
</body>
</html>"#;

const INDEX: &str = r#"{{> base }}
"#;

const LESSON: &str = r#"{{> base }}
"#;

const HEADER: &str = r#"<header>
  <div class="container">
    {{ header_content }}
  </div>
</header>"#;

const FOOTER: &str = r#"<footer>
  <div class="container">
    <div class="small">Generated by TML Parser v0.1</div>
  </div>
</footer>"#;

const STYLES: &str = r#"<style>
:root{--accent:#1f6feb;}
*{box-sizing:border-box}
body{font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu,Arial,sans-serif;line-height:1.6;margin:0;padding:0;background:#0e1116;color:#c9d1d9}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
header,footer{background:#0b0e14;padding:1rem 1.25rem;border-bottom:1px solid #161b22}
.container{max-width:980px;margin:0 auto;padding:1.25rem}
.card{background:#0b0e14;border:1px solid #161b22;border-radius:12px;padding:1rem;margin:1rem 0}
.btn{display:inline-block;padding:.5rem .9rem;border:1px solid #30363d;border-radius:8px;background:#161b22;color:#c9d1d9;cursor:pointer}
.btn:hover{background:#1b2330}
.progress{width:100%;height:10px;background:#161b22;border-radius:999px;overflow:hidden;border:1px solid #30363d}
.progress > span{display:block;height:100%;background:var(--accent);width:0%}
.badge{display:inline-block;background:#161b22;border:1px solid #30363d;padding:.2rem .5rem;border-radius:999px;margin-right:.25rem}
.quiz{margin-top:1rem}
.quiz .q{margin:.5rem 0;padding:.75rem;border:1px dashed #30363d;border-radius:8px}
code{background:#161b22;border:1px solid #30363d;border-radius:6px;padding:.1rem .3rem}
ul{margin:.25rem 0 .75rem .9rem}
h1,h2,h3{color:#e6edf3}
.small{font-size:.9rem;color:#8b949e}
footer{border-top:1px solid #161b22;border-bottom:0;margin-top:2rem}
kbd{border:1px solid #30363d;border-bottom-width:2px;padding:.1rem .25rem;border-radius:4px;background:#0b0e14}
</style>"#;

const SCRIPTS: &str = r#"<script>
const storeKey = (courseId) => `tml-progress::${courseId}`;
function getProgress(courseId){
  const raw = localStorage.getItem(storeKey(courseId));
  return raw ? JSON.parse(raw) : {completedLessons: {}, scores: {}};
}
function setProgress(courseId, data){
  localStorage.setItem(storeKey(courseId), JSON.stringify(data));
}
function markLessonComplete(courseId, lessonId){
  const p = getProgress(courseId);
  p.completedLessons[lessonId] = true;
  setProgress(courseId, p);
  updateProgressBar(courseId);
}
function saveScore(courseId, assessId, score){
  const p = getProgress(courseId);
  p.scores[assessId] = Math.max(p.scores[assessId]||0, score);
  setProgress(courseId, p);
  updateProgressBar(courseId);
}
function updateProgressBar(courseId){
  const p = getProgress(courseId);
  const total = parseInt(document.body.dataset.totalLessons || "0");
  const done = Object.keys(p.completedLessons).length;
  const pct = total>0 ? Math.round((done/total)*100) : 0;
  const el = document.querySelector('.progress > span');
  if(el){ el.style.width = pct + '%'; }
  const label = document.getElementById('progress-label');
  if(label){ label.textContent = pct + '% complete'; }
}
function checkQuiz(courseId, assessId){
  const assessEl = document.querySelector(`[data-assessment='${assessId}']`);
  let total=0, correct=0;
  assessEl.querySelectorAll('.q').forEach((q)=>{
    total++;
    const type = q.dataset.type;
    if(type==='mcq'){
      const chosen = q.querySelector('input[type=radio]:checked');
      if(!chosen) return;
      if(chosen.value === 'true') correct++;
    }else if(type==='msq'){
      let ok=true, any=false;
      q.querySelectorAll('input[type=checkbox]').forEach(cb=>{
        any = any || cb.checked;
        if((cb.value==='true') !== cb.checked){ ok=false; }
      });
      if(any && ok) correct++;
    }else if(type==='truefalse'){
      const chosen = q.querySelector('input[type=radio]:checked');
      if(chosen && chosen.value === q.dataset.answer) correct++;
    }
  });
  const score = Math.round((correct/Math.max(total,1))*100);
  saveScore(courseId, assessId, score);
  const out = assessEl.querySelector('.quiz-result');
  if(out){ out.textContent = `Score: ${score}% (${correct}/${Math.max(total,1)})`; }
}
document.addEventListener('DOMContentLoaded', ()=>{
  const cid = document.body.dataset.courseId;
  updateProgressBar(cid);
});
</script>"#;

const INDEX_HEADER: &str = r#"<h1>{{ title }}</h1>
<div class="small">
  <span class="badge">Level: {{ level }}</span>
  <span class="badge">Duration: {{ duration }}</span>
</div>
<div class="progress"><span></span></div>
<div class="small" id="progress-label">0% complete</div>"#;

const LESSON_HEADER: &str = r#"<div class="small"><a href="index.html">{{ course_title }}</a> / {{ module_title }}</div>
<h1>{{ lesson_title }}</h1>"#;

const MODULE_CARD: &str = r#"<div class="card">
  <h2>{{ mod_title }}</h2>
  <ul>
{{ lessons }}
  </ul>
</div>"#;

const LESSON_ITEM: &str = r#"<li><a href="{{ lesson_file }}">{{ lesson_title }}</a> <span class="small">{{ duration }}</span></li>"#;

const SLIDE: &str = r#"<section class="card slide slide-{{ slide_kind }}" id="{{ slide_id }}" data-slide="{{ slide_number }}">
  <div class="small slide-counter">Slide {{ slide_number }} / {{ slide_total }}</div>
  {{ slide_body }}
  <nav class="slide-nav">{{ slide_nav }}</nav>
</section>"#;

const ACTIVITY: &str = r#"<div class="activity" data-activity="{{ activity_id }}">
  <h2>Activity: {{ activity_type }}</h2>
  {{ est_html }}
  <div class="instructions">{{ instructions }}</div>
  {{ expected_html }}
</div>"#;

const WORKED_EXAMPLE: &str = r#"<div class="activity worked-example" data-activity="{{ activity_id }}">
  <h2>Worked Example</h2>
  {{ est_html }}
  <div class="explanation">{{ explanation }}</div>
  <pre><code class="language-javascript">{{ code }}</code></pre>
  {{ takeaways_html }}
</div>"#;

const ASSESSMENT: &str = r#"<div class="quiz" data-assessment="{{ assess_id }}" data-pass-score="{{ pass_score }}">
  <h2>Assessment</h2>
  <div class="small">Pass score: {{ pass_score }}%</div>
  {{ questions }}
  <button class="btn" onclick="checkQuiz('{{ course_js }}','{{ assess_js }}')">Check Answers</button>
  <div class="quiz-result small"></div>
</div>"#;

const QUESTION: &str = r#"<div class="q" data-type="{{ q_type }}" data-points="{{ points }}">
  <div><strong>Q{{ q_index }}.</strong> {{ stem }}</div>
  {{ choices }}
</div>"#;

const QUESTION_OPEN: &str = r#"<div class="q" data-type="{{ q_type }}" data-points="{{ points }}">
  <div><strong>Q{{ q_index }}.</strong> {{ prompt }}</div>
  <textarea name="{{ q_name }}" rows="{{ rows }}" data-lang="{{ lang }}">{{ starter }}</textarea>
  {{ solution_html }}
</div>"#;

const COMPLETION: &str = r#"<h2>Lesson Complete</h2>
<p>You have reached the end of <strong>{{ lesson_title }}</strong>.</p>
<div class="progress"><span></span></div>
<div class="small" id="progress-label">0% complete</div>
<button class="btn" onclick="markLessonComplete('{{ course_js }}','{{ lesson_js }}')">Mark Lesson Complete</button>
<p><a href="index.html">Back to course</a></p>"#;
